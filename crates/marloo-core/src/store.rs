//! Record-store seam: the async contract a knowledge-base backend implements.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::{EvidenceItem, FlagTemplate, Requirement, SourceDocument};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store request failed: {0}")]
    Transport(String),

    #[error("record store returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("failed to decode record store response: {0}")]
    Decode(String),
}

/// Queryable knowledge-base backend.
///
/// Implementations return full per-subclass catalogs with structured dates;
/// effective-date selection is applied by the consumer, not the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All requirement versions recorded for a visa subclass.
    async fn requirements(&self, subclass_code: &str) -> Result<Vec<Requirement>, StoreError>;

    /// All evidence-item versions attached to the given requirement ids.
    async fn evidence_items(
        &self,
        requirement_ids: &[String],
    ) -> Result<Vec<EvidenceItem>, StoreError>;

    /// All flag-template versions recorded for a visa subclass.
    async fn flag_templates(&self, subclass_code: &str) -> Result<Vec<FlagTemplate>, StoreError>;

    /// Source-document stubs backing a subclass, for staleness evaluation.
    async fn source_documents(
        &self,
        subclass_code: &str,
    ) -> Result<Vec<SourceDocument>, StoreError>;
}
