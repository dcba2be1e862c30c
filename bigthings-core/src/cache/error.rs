use thiserror::Error;

/// Errors from [`crate::cache::LocalCache`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The record is already stored as a favorite.
    #[error("{id} is already a favorite")]
    DuplicateFavorite {
        /// Identifier of the record.
        id: String,
    },
    /// A rating for the record already exists.
    #[error("a rating was already submitted for {id}")]
    DuplicateRating {
        /// Identifier of the record.
        id: String,
    },
    /// The backing store failed.
    #[error("cache storage failed during {operation}: {message}")]
    Storage {
        /// What the cache was doing.
        operation: &'static str,
        /// Backend diagnostic.
        message: String,
    },
}

impl CacheError {
    /// Whether the error rejects a repeated write rather than reporting a
    /// storage failure.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateFavorite { .. } | Self::DuplicateRating { .. }
        )
    }
}
