//! Generation-collaborator seam.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation service not configured: {0}")]
    NotConfigured(String),

    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("generation service returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    Decode(String),
}

/// Lazy, finite sequence of text fragments from one generation request.
///
/// Not restartable; dropping the stream releases the upstream handle.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, GenerateError>> + Send>>;

/// External token-generation collaborator (an LLM behind some transport).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Issue one generation request and return its token stream.
    async fn generate(
        &self,
        system_context: &str,
        user_query: &str,
    ) -> Result<TokenStream, GenerateError>;
}
