//! Core domain types and pure decision rules for visa-readiness knowledge bases.

pub mod effective;
pub mod record;
pub mod staleness;
pub mod store;

pub use effective::{Effective, select_in_force};
pub use record::{
    Confidence, EvidenceItem, FlagTemplate, LegalBasis, OperationalBasis, Requirement, RuleLogic,
    Severity, SourceDocument, SourceType,
};
pub use staleness::{StalenessWarning, days_since, evaluate, evaluate_all, format_banner};
pub use store::{RecordStore, StoreError};
