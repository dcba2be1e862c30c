//! HTTP access to the Big Things catalog.
//!
//! [`HttpCatalogClient`] implements [`bigthings_core::CatalogService`] against
//! the catalog's single-script protocol:
//!
//! - `GET <base>` lists every record.
//! - `GET <base>?action=record&id=<id>` returns one record's detail.
//! - `POST <base>?action=rate&id=<id>&rating=<r>` stores a rating.
//! - `POST <base>?action=submit` with a JSON body proposes a new record.
//!
//! Images live at `<base>images/<file>`. Any status other than 200 is a
//! failure.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use bigthings_core::CatalogService;
//! use bigthings_data::http::{HttpCatalogClient, HttpCatalogConfig};
//!
//! let config = HttpCatalogConfig::default()
//!     .with_timeout(Duration::from_secs(20))
//!     .with_user_agent("my-app/1.0");
//! let client = HttpCatalogClient::with_config(config)?;
//! let detail = client.fetch_record("12")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod endpoint;

pub use client::{ClientBuildError, HttpCatalogClient};
pub use config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpCatalogConfig};
