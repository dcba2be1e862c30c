//! Access to the remote Big Things catalog.
//!
//! The `CatalogService` trait abstracts the catalog endpoint so sessions can
//! run against HTTP in production and in-memory doubles in tests. Calls are
//! independent: there is no queueing, cancellation, or retry.

mod error;
mod service;

pub use error::CatalogError;
pub use service::CatalogService;
