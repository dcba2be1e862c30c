use thiserror::Error;

/// Errors from [`crate::catalog::CatalogService`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The endpoint URL could not be built.
    #[error("invalid catalog URL {url:?}: {message}")]
    InvalidUrl {
        /// The rejected URL or base URL.
        url: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The request could not be sent or the connection failed.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport diagnostic.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The catalog answered with a status other than 200.
    #[error("catalog returned HTTP {status} for {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },
    /// The response body was not the expected JSON.
    #[error("failed to decode catalog response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder diagnostic.
        message: String,
    },
    /// The request body could not be encoded.
    #[error("failed to encode request body: {message}")]
    Encode {
        /// Encoder diagnostic.
        message: String,
    },
}
