//! Remote data access for the Big Things catalog.
//!
//! Responsibilities:
//! - Implement `bigthings_core::CatalogService` over HTTP.
//! - Own URL construction and the JSON wire encoding.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `bigthings-core`).
//! - Keep blocking calls off async executors; the `*_async` methods exist for
//!   callers that already run inside one.

pub mod http;

pub use http::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpCatalogClient, HttpCatalogConfig,
};
