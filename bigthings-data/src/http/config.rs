//! Configuration for [`super::HttpCatalogClient`].

use std::time::Duration;

/// Catalog endpoint used when no other base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.partiklezoo.com/bigthings/";

/// Default user agent for catalog requests.
pub const DEFAULT_USER_AGENT: &str = "bigthings-client/0.1";

/// Configuration for [`super::HttpCatalogClient`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use bigthings_data::HttpCatalogConfig;
///
/// let config = HttpCatalogConfig::new("http://localhost:8080/bigthings")
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("catalog-admin/2.0");
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogConfig {
    /// Base URL of the catalog; requests and image paths are resolved
    /// against it.
    pub base_url: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpCatalogConfig {
    /// Create a configuration for the catalog at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
