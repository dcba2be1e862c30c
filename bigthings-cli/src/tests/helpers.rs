//! Test helpers that run CLI invocations against a scripted catalog.

use super::*;
use crate::commands::open_cache;
use crate::config::SessionConfig;
use bigthings_core::{
    BigThing, CatalogError, CatalogSession, SqliteLocalCache,
    test_support::{StubCatalog, big_thing},
};
use camino::Utf8PathBuf;
use std::cell::RefCell;
use tempfile::TempDir;

/// Records served by the scripted catalog.
pub(super) fn sample_records() -> Vec<BigThing> {
    vec![
        big_thing("1", "Sydney Harbour Bridge", "Sydney, NSW", "4.8"),
        big_thing("2", "Big Banana", "Coffs Harbour, NSW", "3.9"),
        big_thing("3", "Big Prawn", "Ballina, NSW", "not rated"),
        big_thing("4", "Big Pineapple", "Bridgewater, TAS", "4.8"),
    ]
}

/// Builds sessions over a fresh `StubCatalog` and the SQLite cache named by
/// the configuration, so cache state persists between invocations.
#[derive(Debug, Default)]
pub(super) struct StubSessionFactory {
    records: Vec<BigThing>,
    list_error: RefCell<Option<CatalogError>>,
    rating_error: RefCell<Option<CatalogError>>,
    last_config: RefCell<Option<SessionConfig>>,
}

impl StubSessionFactory {
    pub(super) fn new(records: Vec<BigThing>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub(super) fn fail_listing(&self, error: CatalogError) {
        self.list_error.replace(Some(error));
    }

    pub(super) fn fail_rating(&self, error: CatalogError) {
        self.rating_error.replace(Some(error));
    }

    pub(super) fn last_config(&self) -> Option<SessionConfig> {
        self.last_config.borrow().clone()
    }
}

impl SessionFactory for StubSessionFactory {
    type Catalog = StubCatalog;
    type Cache = SqliteLocalCache;

    fn build(
        &self,
        config: &SessionConfig,
    ) -> Result<CatalogSession<Self::Catalog, Self::Cache>, CliError> {
        self.last_config.replace(Some(config.clone()));
        let catalog = StubCatalog::with_records(self.records.clone());
        catalog.fail_listing(self.list_error.borrow().clone());
        catalog.fail_rating(self.rating_error.borrow().clone());
        let cache = open_cache(config)?;
        Ok(CatalogSession::new(catalog, cache))
    }
}

/// A temporary workspace holding the cache database and any input files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn cache_db(&self) -> Utf8PathBuf {
        self.root.join("state/cache.db")
    }

    pub(super) fn write_file(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write workspace file");
        path
    }
}

/// Parse `argv` (without the program name), append `--cache-db`, and run it.
pub(super) fn invoke(
    workspace: &Workspace,
    factory: &StubSessionFactory,
    argv: &[&str],
) -> (Result<(), CliError>, String) {
    let mut full = vec!["bigthings".to_owned()];
    full.extend(argv.iter().map(|arg| (*arg).to_owned()));
    full.push(format!("--{}", crate::config::ARG_CACHE_DB));
    full.push(workspace.cache_db().into_string());

    let mut stdout = Vec::new();
    let result = Cli::try_parse_from(full)
        .map_err(CliError::from)
        .and_then(|cli| run_with(cli.command, factory, &mut stdout));
    let output = String::from_utf8(stdout).expect("stdout utf-8");
    (result, output)
}
