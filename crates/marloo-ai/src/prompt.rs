//! Grounding-context serialization and citation extraction.
//!
//! The system context restates the assistant's role and hard response rules,
//! then digests the in-force requirements and flags so the model's answer is
//! anchored in authoritative content rather than its own recall.

use crate::package::KbPackage;

/// Upper bound on citations attached to one answer.
pub const MAX_CITATIONS: usize = 8;

fn requirement_digest(pkg: &KbPackage) -> String {
    pkg.requirements
        .iter()
        .map(|r| {
            let mut line = format!(
                "- [{}] {}: {}",
                r.requirement_type.to_uppercase(),
                r.title,
                r.plain_english
            );
            if let Some(basis) = r.legal_basis.first() {
                let cite = basis.citation.as_deref().unwrap_or(basis.authority.as_str());
                line.push_str(&format!(" [Citation: {cite}]"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn flag_digest(pkg: &KbPackage) -> String {
    pkg.flag_templates
        .iter()
        .map(|f| {
            format!(
                "- [FLAG/{}] {}: {}",
                f.severity.as_str().to_uppercase(),
                f.title,
                f.why_it_matters
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the system context for one grounded-answer request.
pub fn build_system_context(pkg: &KbPackage, subclass_code: &str) -> String {
    let requirements = match requirement_digest(pkg) {
        s if s.is_empty() => "No structured requirements loaded for this visa.".to_string(),
        s => s,
    };
    let flags = match flag_digest(pkg) {
        s if s.is_empty() => "No flags loaded for this visa.".to_string(),
        s => s,
    };

    format!(
        "You are an Australian visa-readiness assistant.\n\
         \n\
         ROLE: Help users prepare structured, evidence-based visa application packs.\n\
         You are NOT a lawyer and do NOT give legal advice. You NEVER guarantee or predict outcomes.\n\
         \n\
         CURRENT CONTEXT:\n\
         - Visa subclass: {subclass_code}\n\
         - Case date: {case_date}\n\
         - Knowledge base loaded: {n_requirements} requirements, {n_flags} flags\n\
         \n\
         REQUIREMENTS FOR THIS VISA (from Australian migration law):\n\
         {requirements}\n\
         \n\
         RISK FLAGS FOR THIS VISA:\n\
         {flags}\n\
         \n\
         RESPONSE RULES (non-negotiable):\n\
         1. Use \"risk indicator\" or \"flag\". Never \"you are eligible\", \"guaranteed\", \"approved\", or \"you will\".\n\
         2. Always include an Assumptions block at the start of your response.\n\
         3. Always end with a Next Actions block (max 5 items, each starting with a verb).\n\
         4. Cite the source for every factual criterion you state.\n\
         5. If you cannot ground a claim in the knowledge base above, say so explicitly.\n\
         6. Write in plain English: short sentences, bullets where possible.\n\
         7. If asked about falsifying, fabricating, or hiding information: refuse clearly.",
        case_date = pkg.case_date,
        n_requirements = pkg.requirements.len(),
        n_flags = pkg.flag_templates.len(),
    )
}

/// Extract the citation list for one answer from the in-force requirements.
///
/// Walks each requirement's legal basis (citation, else series, else authority
/// name) then operational basis urls, in selection order. Exact-string
/// duplicates are skipped; the result is capped at [`MAX_CITATIONS`].
pub fn extract_citations(pkg: &KbPackage) -> Vec<String> {
    let mut citations: Vec<String> = Vec::new();
    let push = |citations: &mut Vec<String>, cite: String| {
        if !citations.contains(&cite) {
            citations.push(cite);
        }
    };

    for req in &pkg.requirements {
        for basis in &req.legal_basis {
            let cite = basis
                .citation
                .clone()
                .or_else(|| basis.series.clone())
                .unwrap_or_else(|| basis.authority.as_str().to_string());
            push(&mut citations, cite);
        }
        for basis in &req.operational_basis {
            push(&mut citations, basis.url.clone());
        }
    }

    citations.truncate(MAX_CITATIONS);
    citations
}
