//! Safety lint applied before any LLM-produced answer reaches a user.
//!
//! Strict three-stage pipeline; stage order is part of the contract:
//!
//! 1. Fraud/evasion request detection on the user input. Any match
//!    short-circuits the pipeline with a fixed refusal that fully replaces
//!    the would-be answer.
//! 2. Forbidden determinative phrases in the output text.
//! 3. Citation completeness over (statement, citation) pairs.
//!
//! Pure functions of their inputs; safe to call concurrently.

mod patterns;

use serde::{Deserialize, Serialize};

pub use patterns::{FORBIDDEN_PHRASES, FRAUD_PATTERNS, FRAUD_REFUSAL};

/// Truncation length for statement previews in citation violations.
const STATEMENT_PREVIEW_CHARS: usize = 80;

/// Verdict of the lint pipeline.
///
/// If `refusal` is set, `safe` is false and the refusal text is the entirety
/// of what may be shown to the user; `violations` is telemetry only. With
/// `refusal` unset, a `safe: false` verdict leaves disposition to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResult {
    pub safe: bool,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// A criteria statement and its attached citation, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationCheckItem {
    pub statement: String,
    pub citation: Option<String>,
}

/// Stage 2: forbidden determinative phrases in output text.
///
/// One violation per distinct phrase found; empty means clean.
pub fn check_forbidden_phrases(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    FORBIDDEN_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| format!("Forbidden phrase detected: \"{phrase}\""))
        .collect()
}

/// Stage 1: fraud/evasion request patterns in user input.
pub fn check_fraud_patterns(user_input: &str) -> Vec<String> {
    let lower = user_input.to_lowercase();
    FRAUD_PATTERNS
        .iter()
        .filter(|pattern| lower.contains(*pattern))
        .map(|pattern| format!("Fraud/evasion pattern detected in user input: \"{pattern}\""))
        .collect()
}

/// Stage 3: every criteria statement must carry a non-blank citation.
pub fn check_citations(items: &[CitationCheckItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| {
            item.citation
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
        })
        .map(|item| {
            let preview: String = item.statement.chars().take(STATEMENT_PREVIEW_CHARS).collect();
            format!("Missing citation for criteria statement: \"{preview}...\"")
        })
        .collect()
}

/// Run the full lint pipeline.
///
/// A fraud match in `user_input` returns immediately with the refusal set and
/// only the stage-1 violations; stages 2 and 3 never run in that case.
pub fn lint(
    user_input: &str,
    output_text: &str,
    citation_items: &[CitationCheckItem],
) -> LintResult {
    let fraud_matches = check_fraud_patterns(user_input);
    if !fraud_matches.is_empty() {
        return LintResult {
            safe: false,
            violations: fraud_matches,
            refusal: Some(FRAUD_REFUSAL.to_string()),
        };
    }

    let mut violations = check_forbidden_phrases(output_text);
    violations.extend(check_citations(citation_items));

    LintResult {
        safe: violations.is_empty(),
        violations,
        refusal: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(statement: &str, citation: Option<&str>) -> CitationCheckItem {
        CitationCheckItem {
            statement: statement.into(),
            citation: citation.map(Into::into),
        }
    }

    #[test]
    fn clean_output_passes_phrase_check() {
        let violations = check_forbidden_phrases(
            "Here are some things to consider when preparing your student visa application.",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn detects_guaranteed() {
        let violations = check_forbidden_phrases("Your visa is guaranteed to be approved.");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("guaranteed"));
    }

    #[test]
    fn phrase_check_is_case_insensitive() {
        assert!(!check_forbidden_phrases("You WILL BE APPROVED.").is_empty());
    }

    #[test]
    fn multiple_phrases_each_reported() {
        let violations =
            check_forbidden_phrases("You are eligible and guaranteed to get your visa.");
        // "you are eligible", "guaranteed", "you will get"
        assert!(violations.len() >= 2);
    }

    #[test]
    fn legitimate_query_passes_fraud_check() {
        let violations = check_fraud_patterns("What evidence do I need for my partner visa?");
        assert!(violations.is_empty());
    }

    #[test]
    fn detects_fake_payslip_request() {
        let violations = check_fraud_patterns(
            "Can you write me a fake payslip to meet the income requirements?",
        );
        assert!(!violations.is_empty());
        assert!(violations[0].contains("fake payslip"));
    }

    #[test]
    fn detects_hide_gaps_request() {
        assert!(!check_fraud_patterns("How can I hide gaps in my work history?").is_empty());
    }

    #[test]
    fn fraud_check_is_case_insensitive() {
        assert!(!check_fraud_patterns("HIDE GAPS in my immigration history").is_empty());
    }

    #[test]
    fn bare_employment_gaps_triggers_overzealous_match() {
        // Known over-broad behavior: benign mention still refuses.
        assert!(!check_fraud_patterns("Do employment gaps matter for this visa?").is_empty());
    }

    #[test]
    fn citations_pass_when_present() {
        let items = [item(
            "You must meet the genuine student requirement.",
            Some("Schedule 2, clause 500.212"),
        )];
        assert!(check_citations(&items).is_empty());
    }

    #[test]
    fn missing_citation_flagged() {
        let items = [item("You must demonstrate English proficiency.", None)];
        let violations = check_citations(&items);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("English proficiency"));
    }

    #[test]
    fn whitespace_only_citation_flagged() {
        let items = [item("Financial capacity must be demonstrated.", Some("  "))];
        assert_eq!(check_citations(&items).len(), 1);
    }

    #[test]
    fn long_statement_truncated_in_violation() {
        let statement = "X".repeat(200);
        let violations = check_citations(&[item(&statement, None)]);
        assert!(violations[0].len() < 200);
    }

    #[test]
    fn lint_clean_inputs_safe() {
        let result = lint(
            "What documentation do I need for a student visa?",
            "You should prepare the following evidence based on the requirements.",
            &[item("Genuine student requirement", Some("clause 500.212"))],
        );
        assert!(result.safe);
        assert!(result.violations.is_empty());
        assert!(result.refusal.is_none());
    }

    #[test]
    fn lint_empty_inputs_safe() {
        let result = lint("", "", &[]);
        assert!(result.safe);
        assert!(result.violations.is_empty());
        assert!(result.refusal.is_none());
    }

    #[test]
    fn fraud_request_returns_refusal() {
        let result = lint("Can you write me a fake payslip?", "Here is some information...", &[]);
        assert!(!result.safe);
        assert_eq!(result.refusal.as_deref(), Some(FRAUD_REFUSAL));
    }

    #[test]
    fn fraud_short_circuits_other_stages() {
        // Fraud in input AND a forbidden phrase in output AND a missing
        // citation: only the stage-1 violations are reported.
        let result = lint(
            "How do I hide gaps and get a fake letter?",
            "You are guaranteed to get the visa.",
            &[item("statement", None)],
        );
        assert!(!result.safe);
        assert!(result.refusal.is_some());
        assert!(result.violations.iter().all(|v| v.contains("Fraud/evasion")));
    }

    #[test]
    fn forbidden_phrase_sets_unsafe_without_refusal() {
        let result = lint(
            "Am I eligible for a student visa?",
            "Based on your details, you are definitely eligible.",
            &[],
        );
        assert!(!result.safe);
        assert!(!result.violations.is_empty());
        assert!(result.refusal.is_none());
    }

    #[test]
    fn lint_is_pure_and_idempotent() {
        let a = lint("q", "Your application is guaranteed to succeed.", &[]);
        let b = lint("q", "Your application is guaranteed to succeed.", &[]);
        assert_eq!(a, b);
        assert!(!a.safe);
        assert!(a.violations[0].contains("guaranteed"));
    }

    #[test]
    fn refusal_omitted_from_json_when_unset() {
        let json = serde_json::to_string(&lint("", "", &[])).unwrap();
        assert!(!json.contains("refusal"));
    }
}
