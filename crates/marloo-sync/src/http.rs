//! HTTP client for pulling KB record catalogs from the knowledge-base service.
//!
//! Endpoints return full per-subclass catalogs with structured dates;
//! effective-date selection happens in the consumer, not here. Unparseable
//! dates are a server-side contract violation and surface as decode errors at
//! this boundary, never inside the pure selection rules.

use async_trait::async_trait;
use marloo_core::{
    EvidenceItem, FlagTemplate, RecordStore, Requirement, SourceDocument, StoreError,
};
use serde::de::DeserializeOwned;
use tracing::info;

/// HTTP record store backed by the KB service's REST endpoints.
pub struct KbClient {
    client: reqwest::Client,
    base_url: String,
}

impl KbClient {
    /// Create a client for the given KB service base URL.
    ///
    /// `base_url` should be like `http://localhost:4000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, StoreError> {
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for KbClient {
    async fn requirements(&self, subclass_code: &str) -> Result<Vec<Requirement>, StoreError> {
        let url = format!("{}/api/kb/{}/requirements", self.base_url, subclass_code);
        info!(url = %url, "pulling requirement catalog");
        let records: Vec<Requirement> = self.get_json(url).await?;
        info!(count = records.len(), "pulled requirements");
        Ok(records)
    }

    async fn evidence_items(
        &self,
        requirement_ids: &[String],
    ) -> Result<Vec<EvidenceItem>, StoreError> {
        if requirement_ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/api/kb/evidence?requirement_ids={}",
            self.base_url,
            requirement_ids.join(",")
        );
        info!(url = %url, ids = requirement_ids.len(), "pulling evidence items");
        let records: Vec<EvidenceItem> = self.get_json(url).await?;
        info!(count = records.len(), "pulled evidence items");
        Ok(records)
    }

    async fn flag_templates(&self, subclass_code: &str) -> Result<Vec<FlagTemplate>, StoreError> {
        let url = format!("{}/api/kb/{}/flags", self.base_url, subclass_code);
        info!(url = %url, "pulling flag templates");
        let records: Vec<FlagTemplate> = self.get_json(url).await?;
        info!(count = records.len(), "pulled flag templates");
        Ok(records)
    }

    async fn source_documents(
        &self,
        subclass_code: &str,
    ) -> Result<Vec<SourceDocument>, StoreError> {
        let url = format!("{}/api/kb/{}/sources", self.base_url, subclass_code);
        info!(url = %url, "pulling source documents");
        let records: Vec<SourceDocument> = self.get_json(url).await?;
        info!(count = records.len(), "pulled source documents");
        Ok(records)
    }
}
