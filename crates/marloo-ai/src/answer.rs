//! Grounded-answer orchestration over one request lifecycle:
//! pre-check lint, grounding, token streaming, post-check lint.
//!
//! Each request runs as its own tokio task and resolves to exactly one
//! terminal event (verdict, refusal, or error) unless the caller cancels by
//! dropping the receiver, in which case the task stops forwarding, drops the
//! upstream token stream, and emits nothing further.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::StreamExt;
use marloo_core::{RecordStore, StoreError};
use marloo_lint::lint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::generate::{GenerateError, Generator};
use crate::package::fetch_package;
use crate::prompt::{build_system_context, extract_citations};

/// Channel capacity for one in-flight answer stream.
const EVENT_BUFFER: usize = 32;

/// Terminal safety verdict for one completed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub safe: bool,
    pub violations: Vec<String>,
    pub citations: Vec<String>,
    pub warnings: Vec<String>,
    /// Set only for a policy refusal; the refusal text replaces the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// One event in a grounded-answer stream. Tokens strictly precede the single
/// terminal `Done` or `Error` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerEvent {
    Token(String),
    Done(Verdict),
    Error(String),
}

/// Non-streaming answer result (golden-test and batch surface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub citations: Vec<String>,
    pub safe: bool,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("knowledge base fetch failed: {0}")]
    Store(#[from] StoreError),

    #[error("generation failed: {0}")]
    Generate(#[from] GenerateError),
}

/// Orchestrator over the record store and the generation collaborator.
///
/// Holds no per-request state; safe to share across concurrent requests.
pub struct AnswerEngine {
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn Generator>,
}

impl AnswerEngine {
    pub fn new(store: Arc<dyn RecordStore>, generator: Arc<dyn Generator>) -> Self {
        Self { store, generator }
    }

    /// Run one grounded-answer request, streaming events to the returned
    /// receiver. Dropping the receiver cancels the request.
    pub fn run_grounded_answer(
        &self,
        query: String,
        subclass_code: String,
        reference_date: NaiveDate,
    ) -> mpsc::Receiver<AnswerEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let store = Arc::clone(&self.store);
        let generator = Arc::clone(&self.generator);
        tokio::spawn(async move {
            run_request(store, generator, query, subclass_code, reference_date, tx).await;
        });
        rx
    }

    /// Non-streaming convenience: drain the generator and return the full
    /// answer with its verdict. A pre-check refusal yields an `Ok` outcome
    /// with `refusal` set and an empty answer.
    pub async fn ask(
        &self,
        query: &str,
        subclass_code: &str,
        reference_date: NaiveDate,
    ) -> Result<AnswerOutcome, AnswerError> {
        let pre = lint(query, "", &[]);
        if let Some(refusal) = pre.refusal {
            return Ok(AnswerOutcome {
                answer: String::new(),
                citations: Vec::new(),
                safe: false,
                violations: pre.violations,
                refusal: Some(refusal),
                warnings: Vec::new(),
            });
        }

        let pkg = fetch_package(self.store.as_ref(), subclass_code, reference_date).await?;
        let system_context = build_system_context(&pkg, subclass_code);
        let citations = extract_citations(&pkg);

        let mut stream = self.generator.generate(&system_context, query).await?;
        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            answer.push_str(&fragment?);
        }

        let post = lint(query, &answer, &[]);
        Ok(AnswerOutcome {
            answer,
            citations,
            safe: post.safe,
            violations: post.violations,
            refusal: post.refusal,
            warnings: pkg.warnings,
        })
    }
}

async fn run_request(
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn Generator>,
    query: String,
    subclass_code: String,
    reference_date: NaiveDate,
    tx: mpsc::Sender<AnswerEvent>,
) {
    // PRE_CHECK: fraud in the query refuses before the generator is invoked.
    let pre = lint(&query, "", &[]);
    if let Some(refusal) = pre.refusal {
        info!(
            subclass = %subclass_code,
            violations = pre.violations.len(),
            "fraud/evasion pattern in query; refusing without generation"
        );
        let _ = tx
            .send(AnswerEvent::Done(Verdict {
                safe: false,
                violations: pre.violations,
                citations: Vec::new(),
                warnings: Vec::new(),
                refusal: Some(refusal),
            }))
            .await;
        return;
    }

    let pkg = match fetch_package(store.as_ref(), &subclass_code, reference_date).await {
        Ok(pkg) => pkg,
        Err(e) => {
            warn!(error = %e, "knowledge base fetch failed");
            let _ = tx
                .send(AnswerEvent::Error(format!("knowledge base fetch failed: {e}")))
                .await;
            return;
        }
    };
    let system_context = build_system_context(&pkg, &subclass_code);
    let citations = extract_citations(&pkg);

    // STREAMING: forward tokens as they arrive; no per-token safety gating,
    // phrase checks only make sense on the completed answer.
    let mut stream = match generator.generate(&system_context, &query).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "generation request failed");
            let _ = tx
                .send(AnswerEvent::Error(format!("generation failed: {e}")))
                .await;
            return;
        }
    };

    let mut answer = String::new();
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(token) => {
                answer.push_str(&token);
                if tx.send(AnswerEvent::Token(token)).await.is_err() {
                    // Receiver dropped: cancelled. Drop the stream to release
                    // the generation handle; no verdict after cancellation.
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "generation failed mid-stream");
                let _ = tx
                    .send(AnswerEvent::Error(format!("generation failed: {e}")))
                    .await;
                return;
            }
        }
    }
    drop(stream);

    // POST_CHECK: lint the assembled answer; the query has not changed, so
    // stage 1 cannot newly trigger.
    let post = lint(&query, &answer, &[]);
    info!(
        subclass = %subclass_code,
        safe = post.safe,
        violations = post.violations.len(),
        answer_chars = answer.len(),
        "grounded answer complete"
    );
    let _ = tx
        .send(AnswerEvent::Done(Verdict {
            safe: post.safe,
            violations: post.violations,
            citations,
            warnings: pkg.warnings,
            refusal: post.refusal,
        }))
        .await;
}
