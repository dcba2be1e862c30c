//! Error types emitted by the Big Things CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use bigthings_core::{SessionError, SqliteLocalCacheError};
use bigthings_data::ClientBuildError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the Big Things CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// Constructing the catalog client failed.
    #[error("failed to build catalog client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// Creating the directory that holds the cache database failed.
    #[error("failed to prepare cache directory for {path:?}: {source}")]
    PrepareCacheDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the local cache failed.
    #[error("failed to open local cache at {path:?}: {source}")]
    OpenCache {
        path: Utf8PathBuf,
        #[source]
        source: Box<SqliteLocalCacheError>,
    },
    /// Reading the submission photo failed.
    #[error("failed to read photo {path:?}: {source}")]
    ReadPhoto {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A session operation was refused with a user-facing notice.
    #[error("{notice}")]
    Rejected {
        notice: String,
        #[source]
        source: SessionError,
    },
    /// A session operation failed without a notice.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Serializing records for output failed.
    #[error("failed to serialize records: {0}")]
    SerialiseRecords(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
