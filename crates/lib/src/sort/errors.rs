//! Error types for sort specification handling.

use thiserror::Error;

/// Errors raised while validating or dispatching a sort specification.
///
/// These are invalid-argument failures: they surface immediately to the
/// caller of `sort_by` or the sort-spec setter and are never recovered
/// silently.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SortError {
    /// The member is not in the collection's configured order members
    #[error("'{member}' is not available to sort by")]
    MemberNotOrderable { member: String },

    /// The spec names a custom comparator nothing was registered for
    #[error("No comparator '{name}' registered for member '{member}'")]
    ComparatorNotFound { member: String, name: String },
}

impl SortError {
    /// Get the member the failing specification referred to.
    pub fn member(&self) -> &str {
        match self {
            SortError::MemberNotOrderable { member }
            | SortError::ComparatorNotFound { member, .. } => member,
        }
    }
}

impl From<SortError> for crate::Error {
    fn from(err: SortError) -> Self {
        crate::Error::Sort(err)
    }
}
