//! HTTP-backed `CatalogService`.
//!
//! The [`CatalogService`] trait is synchronous so the core session stays
//! usable from plain threads. This client bridges to async `reqwest` calls by
//! blocking on a Tokio runtime it owns, or on the caller's multi-threaded
//! runtime when one is active.

use std::{future::Future, thread};

use bigthings_core::{BigThing, CatalogError, CatalogService, NewBigThing};
use log::{debug, warn};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::config::HttpCatalogConfig;
use super::endpoint::Endpoints;

/// Errors raised while constructing an [`HttpCatalogClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is unusable.
    #[error(transparent)]
    BaseUrl(#[from] CatalogError),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Catalog client speaking the Big Things HTTP protocol.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, blocking calls run on the client's own runtime.
/// Inside a multi-threaded runtime the caller's handle is used with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime the call
/// is driven by the client's runtime on a scoped helper thread, since that
/// runtime's only worker is the blocked caller. Callers that are already async
/// should prefer the `*_async` methods.
///
/// The owned runtime shuts down in the background when the client is dropped,
/// so dropping it inside an async context is safe.
///
/// # Examples
///
/// ```no_run
/// use bigthings_core::CatalogService;
/// use bigthings_data::HttpCatalogClient;
///
/// let client = HttpCatalogClient::new("https://www.partiklezoo.com/bigthings/")?;
/// for record in client.list_records()? {
///     println!("{} ({})", record.name, record.location);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HttpCatalogClient {
    client: Client,
    config: HttpCatalogConfig,
    endpoints: Endpoints,
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpCatalogClient {
    /// Create a client for the catalog at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpCatalogConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpCatalogConfig) -> Result<Self, ClientBuildError> {
        let endpoints = Endpoints::parse(&config.base_url)?;
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder.build().map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoints,
            runtime: Some(runtime),
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpCatalogConfig {
        &self.config
    }

    /// The normalised base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.endpoints.base()
    }

    /// URL of a record's image file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] when `image` cannot be joined to
    /// the base URL.
    pub fn image_url(&self, image: &str) -> Result<Url, CatalogError> {
        self.endpoints.image(image)
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on transport failure, a non-200 status, or a
    /// body that is not a JSON array of records.
    pub async fn list_records_async(&self) -> Result<Vec<BigThing>, CatalogError> {
        self.get_records(self.endpoints.list()).await
    }

    /// Fetch the detail records for `id`.
    ///
    /// # Errors
    ///
    /// See [`Self::list_records_async`].
    pub async fn fetch_record_async(&self, id: &str) -> Result<Vec<BigThing>, CatalogError> {
        self.get_records(self.endpoints.record(id)).await
    }

    /// Submit a rating for `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on transport failure or a non-200 status.
    pub async fn submit_rating_async(&self, id: &str, rating: f64) -> Result<(), CatalogError> {
        let url = self.endpoints.rate(id, rating);
        let request = self.client.post(url.clone());
        self.send(request, &url).await.map(|_| ())
    }

    /// Submit a new record as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Encode`] when the body cannot be serialised and
    /// otherwise behaves like [`Self::submit_rating_async`].
    pub async fn submit_record_async(&self, submission: &NewBigThing) -> Result<(), CatalogError> {
        let url = self.endpoints.submit();
        let body = serde_json::to_vec(&submission.payload()).map_err(|err| {
            CatalogError::Encode {
                message: err.to_string(),
            }
        })?;
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, &url).await.map(|_| ())
    }

    async fn get_records(&self, url: Url) -> Result<Vec<BigThing>, CatalogError> {
        let request = self.client.get(url.clone());
        let response = self.send(request, &url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let records = decode_records(&body, &url)?;
        debug!("decoded {} records from {url}", records.len());
        Ok(records)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, CatalogError> {
        debug!("requesting {url}");
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        check_status(response.status(), url)?;
        Ok(response)
    }

    /// Convert a reqwest error to a `CatalogError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> CatalogError {
        if error.is_timeout() {
            return CatalogError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.map_or(0, |timeout| timeout.as_secs()),
            };
        }
        if let Some(status) = error.status() {
            return CatalogError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        CatalogError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    fn block_on<F, T>(&self, future: F) -> Result<T, CatalogError>
    where
        F: Future<Output = Result<T, CatalogError>> + Send,
        T: Send,
    {
        let runtime = self.runtime.as_ref().ok_or_else(|| CatalogError::Network {
            url: self.endpoints.base().to_string(),
            message: "client runtime has shut down".to_owned(),
        })?;
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // A runtime cannot be started from a thread already driving one.
            Ok(_) => thread::scope(|scope| {
                scope
                    .spawn(|| runtime.block_on(future))
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            }),
            Err(_) => runtime.block_on(future),
        }
    }
}

/// Only 200 counts as success; redirects are followed by the transport.
fn check_status(status: StatusCode, url: &Url) -> Result<(), CatalogError> {
    if status == StatusCode::OK {
        return Ok(());
    }
    warn!("catalog answered {status} for {url}");
    Err(CatalogError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

fn decode_records(body: &[u8], url: &Url) -> Result<Vec<BigThing>, CatalogError> {
    serde_json::from_slice(body).map_err(|err| CatalogError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

impl Drop for HttpCatalogClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl CatalogService for HttpCatalogClient {
    fn list_records(&self) -> Result<Vec<BigThing>, CatalogError> {
        self.block_on(self.list_records_async())
    }

    fn fetch_record(&self, id: &str) -> Result<Vec<BigThing>, CatalogError> {
        self.block_on(self.fetch_record_async(id))
    }

    fn submit_rating(&self, id: &str, rating: f64) -> Result<(), CatalogError> {
        self.block_on(self.submit_rating_async(id, rating))
    }

    fn submit_record(&self, submission: &NewBigThing) -> Result<(), CatalogError> {
        self.block_on(self.submit_record_async(submission))
    }
}
