//! URL construction for the catalog's query-string actions.

use bigthings_core::CatalogError;
use url::Url;

/// Resolved catalog URLs.
///
/// The catalog serves every action from one script, selected with an
/// `action` query parameter, and images from an `images/` directory beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse `base_url`, adding a trailing slash so relative paths resolve
    /// beneath it.
    pub(crate) fn parse(base_url: &str) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim();
        let normalised = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        let base = Url::parse(&normalised).map_err(|err| CatalogError::InvalidUrl {
            url: base_url.to_owned(),
            message: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl {
                url: base_url.to_owned(),
                message: "URL cannot be used as a base".to_owned(),
            });
        }
        Ok(Self { base })
    }

    pub(crate) fn base(&self) -> &Url {
        &self.base
    }

    pub(crate) fn list(&self) -> Url {
        self.base.clone()
    }

    pub(crate) fn record(&self, id: &str) -> Url {
        self.action("record", &[("id", id)])
    }

    /// The rating travels with one decimal place.
    pub(crate) fn rate(&self, id: &str, rating: f64) -> Url {
        let rating = format!("{rating:.1}");
        self.action("rate", &[("id", id), ("rating", &rating)])
    }

    pub(crate) fn submit(&self) -> Url {
        self.action("submit", &[])
    }

    pub(crate) fn image(&self, image: &str) -> Result<Url, CatalogError> {
        let relative = format!("images/{}", image.trim().trim_start_matches('/'));
        self.base
            .join(&relative)
            .map_err(|err| CatalogError::InvalidUrl {
                url: relative,
                message: err.to_string(),
            })
    }

    fn action(&self, action: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }
}
