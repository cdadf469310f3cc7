//! Sync layer: HTTP record-store client for the KB service.

mod http;

pub use http::KbClient;
