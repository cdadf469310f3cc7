//! Per-request KB package assembly: fetch catalogs, apply effective-date
//! selection, and record degrade/empty-selection warnings.

use chrono::{NaiveDate, NaiveTime};
use marloo_core::{
    EvidenceItem, FlagTemplate, RecordStore, Requirement, StoreError, select_in_force,
    staleness,
};
use tracing::{info, warn};

/// The in-force records grounding one request, plus any warnings accrued
/// while assembling them. Request-scoped; never stored.
#[derive(Debug, Clone)]
pub struct KbPackage {
    pub requirements: Vec<Requirement>,
    pub evidence_items: Vec<EvidenceItem>,
    pub flag_templates: Vec<FlagTemplate>,
    pub case_date: NaiveDate,
    pub warnings: Vec<String>,
}

/// Fetch and select the KB package for a subclass as at `case_date`.
///
/// Requirements are fetched first; if that fails, the whole request fails.
/// Evidence items (keyed by the in-force requirement ids), flag templates, and
/// source-document stubs are fetched concurrently; any of those failing
/// independently degrades to an empty list with a recorded warning. An empty
/// in-force requirement set is a valid result and only adds a warning. Stale
/// sources contribute a single aggregate banner warning.
pub async fn fetch_package(
    store: &dyn RecordStore,
    subclass_code: &str,
    case_date: NaiveDate,
) -> Result<KbPackage, StoreError> {
    let catalog = store.requirements(subclass_code).await?;
    let requirements: Vec<Requirement> = select_in_force(&catalog, case_date)
        .into_iter()
        .cloned()
        .collect();
    info!(
        subclass = subclass_code,
        catalog = catalog.len(),
        in_force = requirements.len(),
        "selected in-force requirements"
    );

    let requirement_ids: Vec<String> = requirements
        .iter()
        .map(|r| r.requirement_id.clone())
        .collect();

    let evidence_fut = async {
        if requirement_ids.is_empty() {
            Ok(Vec::new())
        } else {
            store.evidence_items(&requirement_ids).await
        }
    };
    let (evidence, flags, sources) = tokio::join!(
        evidence_fut,
        store.flag_templates(subclass_code),
        store.source_documents(subclass_code),
    );

    let mut warnings = Vec::new();

    let evidence_items = match evidence {
        Ok(items) => select_in_force(&items, case_date)
            .into_iter()
            .cloned()
            .collect(),
        Err(e) => {
            warn!(error = %e, "evidence fetch failed; continuing without evidence items");
            warnings.push(format!("Evidence items could not be loaded: {e}"));
            Vec::new()
        }
    };

    let flag_templates = match flags {
        Ok(items) => select_in_force(&items, case_date)
            .into_iter()
            .cloned()
            .collect(),
        Err(e) => {
            warn!(error = %e, "flag fetch failed; continuing without flag templates");
            warnings.push(format!("Risk flags could not be loaded: {e}"));
            Vec::new()
        }
    };

    match sources {
        Ok(docs) => {
            let as_of = case_date.and_time(NaiveTime::MIN).and_utc();
            let stale = staleness::evaluate_all(&docs, as_of);
            if let Some(banner) = staleness::format_banner(&stale) {
                warn!(stale = stale.len(), "stale sources behind this subclass");
                warnings.push(banner);
            }
        }
        Err(e) => {
            warn!(error = %e, "source document fetch failed; skipping staleness check");
            warnings.push(format!("Source freshness could not be checked: {e}"));
        }
    }

    if requirements.is_empty() {
        warnings.push(format!(
            "No structured requirements found for subclass {subclass_code} as at {case_date}."
        ));
    }

    Ok(KbPackage {
        requirements,
        evidence_items,
        flag_templates,
        case_date,
        warnings,
    })
}
