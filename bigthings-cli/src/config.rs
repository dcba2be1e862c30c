//! Settings shared by every subcommand.

use bigthings_data::DEFAULT_BASE_URL;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_CATALOG_URL: &str = "catalog-url";
pub(crate) const ARG_CACHE_DB: &str = "cache-db";

/// Cache database used when none is configured.
pub(crate) const DEFAULT_CACHE_DB: &str = "bigthings-cache.db";

/// Catalog and cache locations. Values can come from CLI flags,
/// configuration files, or `BIGTHINGS`-prefixed environment variables.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[ortho_config(prefix = "BIGTHINGS")]
pub(crate) struct SessionArgs {
    /// Base URL of the Big Things catalog.
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    /// SQLite database holding favorites and ratings.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<SessionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SessionConfig::from(merged))
    }
}

/// Resolved catalog and cache locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionConfig {
    pub(crate) catalog_url: String,
    pub(crate) cache_db: Utf8PathBuf,
}

impl From<SessionArgs> for SessionConfig {
    fn from(args: SessionArgs) -> Self {
        Self {
            catalog_url: args
                .catalog_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            cache_db: args
                .cache_db
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DB)),
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SessionConfig, CliError> {
    let merged = SessionArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(SessionConfig::from(merged))
}
