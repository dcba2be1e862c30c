//! Local favorites and ratings cache.
//!
//! The `LocalCache` trait stores the small set of records a user favorites or
//! rates on this device. Each identifier holds at most one favorite and one
//! rating; repeated writes are rejected, never merged or overwritten.

use crate::BigThing;

mod error;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::CacheError;
#[cfg(feature = "store-sqlite")]
pub use schema::{CACHE_SCHEMA_VERSION, CacheSchemaError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteLocalCache, SqliteLocalCacheError};

/// Persistent shadow copies of favorites and ratings keyed by record id.
///
/// # Examples
///
/// ```rust
/// use bigthings_core::{BigThing, CacheError, LocalCache};
/// use bigthings_core::test_support::MemoryCache;
///
/// let thing: BigThing = serde_json::from_str(r#"{"id": "7", "name": "Big Rocking Horse"}"#)
///     .expect("valid record");
/// let mut cache = MemoryCache::default();
///
/// cache.add_favorite(&thing)?;
/// assert!(cache.is_favorite("7")?);
/// assert!(matches!(
///     cache.add_favorite(&thing),
///     Err(CacheError::DuplicateFavorite { .. })
/// ));
/// # Ok::<(), CacheError>(())
/// ```
pub trait LocalCache {
    /// Whether a favorite entry exists for `id`.
    fn is_favorite(&self, id: &str) -> Result<bool, CacheError>;

    /// Store `record` as a favorite.
    ///
    /// Implementations must return [`CacheError::DuplicateFavorite`] when an
    /// entry for the record's identifier already exists, leaving it intact.
    fn add_favorite(&mut self, record: &BigThing) -> Result<(), CacheError>;

    /// All favorites in insertion order, flagged as favorites.
    fn list_favorites(&self) -> Result<Vec<BigThing>, CacheError>;

    /// The locally recorded rating for `id`, if any.
    fn rating(&self, id: &str) -> Result<Option<f64>, CacheError>;

    /// Whether a rating entry exists for `id`.
    fn has_rating(&self, id: &str) -> Result<bool, CacheError> {
        Ok(self.rating(id)?.is_some())
    }

    /// Record a rating for `id`.
    ///
    /// Implementations must return [`CacheError::DuplicateRating`] when a
    /// rating for `id` already exists, leaving it intact.
    fn add_rating(&mut self, id: &str, value: f64) -> Result<(), CacheError>;

    /// Destroy every cached entry and start from an empty store.
    fn reset(&mut self) -> Result<(), CacheError>;
}
