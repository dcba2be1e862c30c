//! Core domain types for the Big Things catalog client.
//!
//! Records arrive from a remote catalog with their numeric fields encoded as
//! text. This crate parses them defensively, filters and sorts them for
//! display, validates new submissions, and keeps favorites and ratings in a
//! local cache. [`CatalogSession`] ties the pieces together for front ends.
#![forbid(unsafe_code)]

pub mod cache;
pub mod catalog;
mod numeric;
mod record;
pub mod session;
mod submission;
#[doc(hidden)]
pub mod test_support;
mod view;

pub use cache::{CacheError, LocalCache};
#[cfg(feature = "store-sqlite")]
pub use cache::{SqliteLocalCache, SqliteLocalCacheError};
pub use catalog::{CatalogError, CatalogService};
pub use numeric::parse_numeric;
pub use record::{BigThing, CatalogEntry, ImageRef};
pub use session::{CatalogSession, Notice, RatingOutcome, SessionError, SessionEvent};
pub use submission::{
    INITIAL_RATING, MISSING_DESCRIPTION, NewBigThing, SubmissionBuilder, SubmissionError,
    SubmissionLocation, SubmissionPayload, UNKNOWN_LOCATION,
};
pub use view::{ParseSortOrderError, SortOrder, filter_records, sort_records, visible_records};
