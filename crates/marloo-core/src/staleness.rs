//! Staleness evaluation for source documents.
//!
//! Each source category has a freshness threshold in days, matched to the
//! refresh cadence of its upstream watcher. Primary legislation moves through
//! the register quickly (14 days); agency pages and open datasets are slower
//! (30 days). Categories without an entry take the default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{SourceDocument, SourceType};

/// Threshold applied to categories without a specific entry.
pub const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// Freshness threshold in days for a source category.
pub fn threshold_days(source_type: &SourceType) -> i64 {
    match source_type {
        SourceType::PrimaryLegislationAct
        | SourceType::PrimaryLegislationRegulations
        | SourceType::PrimaryLegislationInstrument => 14,
        SourceType::GovernmentAgencyPage | SourceType::OpenGovernmentDataset => 30,
        SourceType::Other(_) => DEFAULT_THRESHOLD_DAYS,
    }
}

/// A source document older than its category's threshold.
///
/// Derived per evaluation call, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalenessWarning {
    pub source_doc_id: String,
    pub source_type: SourceType,
    pub canonical_url: String,
    pub title: Option<String>,
    pub retrieved_at: DateTime<Utc>,
    pub days_since_retrieved: i64,
    pub threshold_days: i64,
    pub message: String,
}

/// Whole days elapsed between `retrieved_at` and `as_of` (floor).
pub fn days_since(retrieved_at: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    (as_of - retrieved_at).num_days()
}

/// Evaluate one source document against its category threshold.
///
/// Returns `None` when `days_since <= threshold` (not stale).
pub fn evaluate(doc: &SourceDocument, as_of: DateTime<Utc>) -> Option<StalenessWarning> {
    let threshold = threshold_days(&doc.source_type);
    let days = days_since(doc.retrieved_at, as_of);
    if days <= threshold {
        return None;
    }

    let display_name = doc.title.as_deref().unwrap_or(&doc.canonical_url);
    let message = format!(
        "Source \"{display_name}\" ({}) was last retrieved {days} days ago \
         (threshold: {threshold} days). Displayed information may not reflect \
         the latest changes. Verify against the official source before relying \
         on this content.",
        doc.source_type,
    );

    Some(StalenessWarning {
        source_doc_id: doc.source_doc_id.clone(),
        source_type: doc.source_type.clone(),
        canonical_url: doc.canonical_url.clone(),
        title: doc.title.clone(),
        retrieved_at: doc.retrieved_at,
        days_since_retrieved: days,
        threshold_days: threshold,
        message,
    })
}

/// Evaluate a batch of source documents, preserving input order.
pub fn evaluate_all(docs: &[SourceDocument], as_of: DateTime<Utc>) -> Vec<StalenessWarning> {
    docs.iter().filter_map(|doc| evaluate(doc, as_of)).collect()
}

/// Collapse a non-empty warning list into one user-facing banner line.
pub fn format_banner(warnings: &[StalenessWarning]) -> Option<String> {
    if warnings.is_empty() {
        return None;
    }
    let sources = warnings
        .iter()
        .map(|w| w.title.as_deref().unwrap_or(&w.canonical_url))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Some sources may not be current: {sources}. Sources are refreshed \
         regularly, but always verify critical requirements against the \
         authoritative publication before lodging an application."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn doc(source_type: SourceType, age_days: i64, as_of: DateTime<Utc>) -> SourceDocument {
        SourceDocument {
            source_doc_id: "SRC-1".into(),
            source_type,
            canonical_url: "https://example.gov.au/page".into(),
            retrieved_at: as_of - Duration::days(age_days),
            title: Some("Example page".into()),
        }
    }

    fn as_of() -> DateTime<Utc> {
        "2026-03-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn agency_page_fresh_at_threshold() {
        let d = doc(SourceType::GovernmentAgencyPage, 30, as_of());
        assert!(evaluate(&d, as_of()).is_none());
    }

    #[test]
    fn agency_page_stale_one_day_past_threshold() {
        let d = doc(SourceType::GovernmentAgencyPage, 31, as_of());
        let warning = evaluate(&d, as_of()).unwrap();
        assert_eq!(warning.days_since_retrieved, 31);
        assert_eq!(warning.threshold_days, 30);
        assert!(warning.message.contains("Example page"));
        assert!(warning.message.contains("31 days ago"));
    }

    #[test]
    fn legislation_cutoff_is_fourteen_days() {
        let fresh = doc(SourceType::PrimaryLegislationAct, 14, as_of());
        assert!(evaluate(&fresh, as_of()).is_none());

        let stale = doc(SourceType::PrimaryLegislationAct, 15, as_of());
        let warning = evaluate(&stale, as_of()).unwrap();
        assert_eq!(warning.threshold_days, 14);
        assert_eq!(warning.days_since_retrieved, 15);
    }

    #[test]
    fn unknown_category_takes_default_threshold() {
        let fresh = doc(SourceType::Other("tribunal-decision".into()), 30, as_of());
        assert!(evaluate(&fresh, as_of()).is_none());

        let stale = doc(SourceType::Other("tribunal-decision".into()), 45, as_of());
        assert_eq!(evaluate(&stale, as_of()).unwrap().threshold_days, 30);
    }

    #[test]
    fn partial_day_truncates_to_whole_days() {
        // 30 days and 23 hours old still counts as 30 days: not stale.
        let mut d = doc(SourceType::GovernmentAgencyPage, 30, as_of());
        d.retrieved_at -= Duration::hours(23);
        assert!(evaluate(&d, as_of()).is_none());
    }

    #[test]
    fn message_falls_back_to_url_without_title() {
        let mut d = doc(SourceType::OpenGovernmentDataset, 40, as_of());
        d.title = None;
        let warning = evaluate(&d, as_of()).unwrap();
        assert!(warning.message.contains("https://example.gov.au/page"));
    }

    #[test]
    fn evaluate_all_filters_and_preserves_order() {
        let docs = vec![
            doc(SourceType::PrimaryLegislationAct, 20, as_of()), // stale (14)
            doc(SourceType::GovernmentAgencyPage, 5, as_of()),   // fresh
            doc(SourceType::OpenGovernmentDataset, 60, as_of()), // stale (30)
        ];
        let warnings = evaluate_all(&docs, as_of());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].source_type, SourceType::PrimaryLegislationAct);
        assert_eq!(warnings[1].source_type, SourceType::OpenGovernmentDataset);
    }

    #[test]
    fn empty_batch_yields_no_warnings_and_no_banner() {
        assert!(evaluate_all(&[], as_of()).is_empty());
        assert!(format_banner(&[]).is_none());
    }

    #[test]
    fn banner_joins_source_names() {
        let docs = vec![
            doc(SourceType::PrimaryLegislationAct, 20, as_of()),
            {
                let mut d = doc(SourceType::GovernmentAgencyPage, 40, as_of());
                d.title = None;
                d.canonical_url = "https://example.gov.au/other".into();
                d
            },
        ];
        let banner = format_banner(&evaluate_all(&docs, as_of())).unwrap();
        assert!(banner.contains("Example page, https://example.gov.au/other"));
    }
}
