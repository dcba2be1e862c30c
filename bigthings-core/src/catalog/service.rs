//! The catalog service trait.

use crate::{BigThing, NewBigThing};

use super::error::CatalogError;

/// Read and write access to the remote catalog.
///
/// Implementations may block on asynchronous I/O internally; callers see a
/// synchronous interface.
///
/// # Examples
///
/// ```rust
/// use bigthings_core::{BigThing, CatalogError, CatalogService, NewBigThing};
///
/// struct Offline;
///
/// impl CatalogService for Offline {
///     fn list_records(&self) -> Result<Vec<BigThing>, CatalogError> {
///         Ok(Vec::new())
///     }
///
///     fn fetch_record(&self, id: &str) -> Result<Vec<BigThing>, CatalogError> {
///         Err(CatalogError::Network {
///             url: format!("offline://{id}"),
///             message: "offline".into(),
///         })
///     }
///
///     fn submit_rating(&self, _id: &str, _rating: f64) -> Result<(), CatalogError> {
///         Ok(())
///     }
///
///     fn submit_record(&self, _submission: &NewBigThing) -> Result<(), CatalogError> {
///         Ok(())
///     }
/// }
///
/// assert!(Offline.list_records()?.is_empty());
/// # Ok::<(), CatalogError>(())
/// ```
pub trait CatalogService {
    /// Fetch the full catalog in server order.
    fn list_records(&self) -> Result<Vec<BigThing>, CatalogError>;

    /// Fetch the full detail of one record.
    ///
    /// The catalog answers with an array; it is usually a single element and
    /// may be empty for unknown identifiers.
    fn fetch_record(&self, id: &str) -> Result<Vec<BigThing>, CatalogError>;

    /// Persist a rating server-side.
    fn submit_rating(&self, id: &str, rating: f64) -> Result<(), CatalogError>;

    /// Submit a new record for inclusion in the catalog.
    fn submit_record(&self, submission: &NewBigThing) -> Result<(), CatalogError>;
}
