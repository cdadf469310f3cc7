//! Effective-date selection: which dated records are in force at a reference date.
//!
//! The rule is the same for every record kind:
//!
//! ```text
//! effective_from <= reference AND (effective_to IS NULL OR effective_to >= reference)
//! ```
//!
//! Both bounds inclusive, day granularity. Callers pass a [`chrono::NaiveDate`],
//! so any time-of-day component has already been truncated at the boundary.

use chrono::NaiveDate;

/// A record with a validity interval over calendar dates.
pub trait Effective {
    /// Inclusive lower bound of validity.
    fn effective_from(&self) -> NaiveDate;

    /// Inclusive upper bound of validity; `None` means still in force.
    fn effective_to(&self) -> Option<NaiveDate>;

    /// Whether this record's interval contains `reference`.
    fn in_force(&self, reference: NaiveDate) -> bool {
        self.effective_from() <= reference
            && self.effective_to().is_none_or(|to| to >= reference)
    }
}

/// Select the records in force at `reference`, preserving input order.
///
/// Empty input yields empty output. A record whose `effective_from` lies in the
/// future is silently excluded; reporting an empty selection is the caller's
/// concern. The selector is read-only and never panics for well-formed records.
pub fn select_in_force<R: Effective>(records: &[R], reference: NaiveDate) -> Vec<&R> {
    records.iter().filter(|r| r.in_force(reference)).collect()
}
