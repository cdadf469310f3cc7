//! Knowledge-base record types for a visa subclass.
//!
//! Three dated record kinds (requirement, evidence item, flag template) share the
//! same validity interval: `effective_from` inclusive, `effective_to` inclusive or
//! `None` for still-in-force. Payload fields are opaque to the selection rule.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::effective::Effective;

/// Category of an authoritative source, used both as the authority of a basis
/// entry and as the staleness-threshold key of a source document.
///
/// Unrecognized categories deserialize into [`SourceType::Other`] and take the
/// default staleness threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    PrimaryLegislationAct,
    PrimaryLegislationRegulations,
    PrimaryLegislationInstrument,
    GovernmentAgencyPage,
    OpenGovernmentDataset,
    #[serde(untagged)]
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::PrimaryLegislationAct => "primary-legislation-act",
            SourceType::PrimaryLegislationRegulations => "primary-legislation-regulations",
            SourceType::PrimaryLegislationInstrument => "primary-legislation-instrument",
            SourceType::GovernmentAgencyPage => "government-agency-page",
            SourceType::OpenGovernmentDataset => "open-government-dataset",
            SourceType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flag severity, ordered from informational to risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Risk,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Risk => "risk",
        }
    }
}

/// Editorial confidence in a requirement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A citation into primary legislation backing a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalBasis {
    pub authority: SourceType,
    pub citation: Option<String>,
    /// Register identifier of the containing title, when known.
    pub title_id: Option<String>,
    pub series: Option<String>,
    pub notes: Option<String>,
}

/// A pointer to operational (non-legislative) guidance backing a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalBasis {
    pub authority: SourceType,
    pub url: String,
    pub title: String,
    pub last_checked: Option<NaiveDate>,
}

/// Machine-readable sketch of the rule a requirement encodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleLogic {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub logic_notes: Option<String>,
}

/// A single requirement for a visa subclass, valid over a date interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub requirement_id: String,
    pub subclass_code: String,
    /// Coarse category, e.g. "ENGLISH", "FINANCIAL", "CHARACTER".
    pub requirement_type: String,
    pub title: String,
    pub plain_english: String,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub legal_basis: Vec<LegalBasis>,
    pub operational_basis: Vec<OperationalBasis>,
    #[serde(default)]
    pub rule_logic: RuleLogic,
    pub confidence: Confidence,
    pub last_reviewed_at: Option<NaiveDate>,
}

/// An evidence item satisfying one requirement, valid over a date interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub evidence_id: String,
    pub requirement_id: String,
    pub label: String,
    pub description: String,
    /// Display rank within the requirement; lower sorts first.
    pub priority: u32,
    pub what_it_proves: String,
    #[serde(default)]
    pub common_gaps: Vec<String>,
    pub format_notes: String,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

/// A risk-flag template for a visa subclass, valid over a date interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagTemplate {
    pub flag_id: String,
    pub subclass_code: String,
    pub title: String,
    /// Free-form trigger condition schema; opaque to the engine.
    #[serde(default)]
    pub trigger_schema: serde_json::Value,
    pub why_it_matters: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub evidence_examples: Vec<String>,
    pub severity: Severity,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

/// Stub of a source document as held by the record store.
///
/// Read-only to this crate; only `retrieved_at` and `source_type` feed the
/// staleness rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source_doc_id: String,
    pub source_type: SourceType,
    pub canonical_url: String,
    pub retrieved_at: DateTime<Utc>,
    pub title: Option<String>,
}

impl Effective for Requirement {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl Effective for EvidenceItem {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl Effective for FlagTemplate {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}
