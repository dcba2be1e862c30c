//! Facade crate for the Big Things catalog client.
//!
//! This crate re-exports the core domain types and exposes the SQLite cache
//! and the HTTP catalog client behind feature flags.

#![forbid(unsafe_code)]

pub use bigthings_core::{
    BigThing, CacheError, CatalogEntry, CatalogError, CatalogService, CatalogSession, ImageRef,
    LocalCache, NewBigThing, Notice, RatingOutcome, SessionError, SessionEvent, SortOrder,
    SubmissionBuilder, SubmissionError, SubmissionPayload,
};

#[cfg(feature = "store-sqlite")]
pub use bigthings_core::{SqliteLocalCache, SqliteLocalCacheError};

#[cfg(feature = "http")]
pub use bigthings_data::{ClientBuildError, HttpCatalogClient, HttpCatalogConfig};
