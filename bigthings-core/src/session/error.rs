use thiserror::Error;

use crate::{CacheError, CatalogError, SubmissionError};

/// Errors returned by [`crate::CatalogSession`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The remote catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The local cache rejected or failed the write.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The submission failed validation.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// The record's details were downloaded earlier in this session.
    #[error("Big Thing with ID {id} has already been downloaded")]
    AlreadyDownloaded {
        /// Identifier of the record.
        id: String,
    },
    /// No record with this identifier is loaded.
    #[error("no Big Thing with ID {id} is loaded")]
    UnknownRecord {
        /// Identifier that was requested.
        id: String,
    },
    /// The rating lies outside the accepted scale.
    #[error("rating {rating} is outside 0.0..=5.0")]
    RatingOutOfRange {
        /// The rejected rating.
        rating: f64,
    },
}
