//! SQLite-backed [`LocalCache`].

use std::{
    io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi, params};
use thiserror::Error;

use super::schema::{CacheSchemaError, initialise_schema};
use super::{CacheError, LocalCache};
use crate::BigThing;

/// Error raised when opening or recreating the SQLite cache.
#[derive(Debug, Error)]
pub enum SqliteLocalCacheError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite cache at {path}: {source}")]
    OpenDatabase {
        /// Location of the database, `:memory:` for in-memory stores.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or validating the schema failed.
    #[error(transparent)]
    Schema(#[from] CacheSchemaError),
    /// Deleting the database file during a reset failed.
    #[error("failed to remove SQLite cache at {path}: {source}")]
    RemoveDatabase {
        /// Location of the database file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheLocation {
    Memory,
    File(PathBuf),
}

impl CacheLocation {
    fn display_path(&self) -> PathBuf {
        match self {
            Self::Memory => PathBuf::from(":memory:"),
            Self::File(path) => path.clone(),
        }
    }
}

/// Favorites and ratings persisted in a SQLite database.
///
/// Record identifiers are primary keys, so duplicate favorites and ratings are
/// rejected by the database rather than by a prior lookup.
///
/// # Examples
/// ```
/// use bigthings_core::{CacheError, LocalCache, SqliteLocalCache};
///
/// let mut cache = SqliteLocalCache::open_in_memory().expect("open cache");
/// cache.add_rating("12", 4.5)?;
/// assert_eq!(cache.rating("12")?, Some(4.5));
/// assert!(matches!(
///     cache.add_rating("12", 1.0),
///     Err(CacheError::DuplicateRating { .. })
/// ));
/// # Ok::<(), CacheError>(())
/// ```
#[derive(Debug)]
pub struct SqliteLocalCache {
    connection: Connection,
    location: CacheLocation,
}

impl SqliteLocalCache {
    /// Open or create a cache stored at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteLocalCacheError`] when the database cannot be opened or
    /// carries an incompatible schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteLocalCacheError> {
        let location = CacheLocation::File(path.as_ref().to_path_buf());
        let connection = connect(&location)?;
        Ok(Self {
            connection,
            location,
        })
    }

    /// Create a cache that lives only as long as this value.
    ///
    /// # Errors
    /// Returns [`SqliteLocalCacheError`] when SQLite cannot allocate the
    /// database.
    pub fn open_in_memory() -> Result<Self, SqliteLocalCacheError> {
        let location = CacheLocation::Memory;
        let connection = connect(&location)?;
        Ok(Self {
            connection,
            location,
        })
    }

    /// Database file backing the cache, `None` for in-memory caches.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            CacheLocation::Memory => None,
            CacheLocation::File(path) => Some(path),
        }
    }

    fn recreate(&mut self) -> Result<(), SqliteLocalCacheError> {
        // The placeholder carries the schema so the cache stays usable, if
        // empty, when the file cannot be reopened below.
        let placeholder = connect(&CacheLocation::Memory)?;
        let previous = std::mem::replace(&mut self.connection, placeholder);
        if let Err((connection, source)) = previous.close() {
            self.connection = connection;
            return Err(SqliteLocalCacheError::OpenDatabase {
                path: self.location.display_path(),
                source,
            });
        }

        if let CacheLocation::File(path) = &self.location {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("removed cache database {}", path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SqliteLocalCacheError::RemoveDatabase {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        self.connection = connect(&self.location)?;
        Ok(())
    }
}

fn connect(location: &CacheLocation) -> Result<Connection, SqliteLocalCacheError> {
    let opened = match location {
        CacheLocation::Memory => Connection::open_in_memory(),
        CacheLocation::File(path) => Connection::open(path),
    };
    let mut connection = opened.map_err(|source| SqliteLocalCacheError::OpenDatabase {
        path: location.display_path(),
        source,
    })?;
    initialise_schema(&mut connection)?;
    Ok(connection)
}

fn storage(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> CacheError {
    move |source| CacheError::Storage {
        operation,
        message: source.to_string(),
    }
}

/// Whether `error` reports a clash on an existing primary key.
fn is_duplicate_key(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

impl LocalCache for SqliteLocalCache {
    fn is_favorite(&self, id: &str) -> Result<bool, CacheError> {
        self.connection
            .query_row("SELECT 1 FROM favorites WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(storage("look up favorite"))
    }

    fn add_favorite(&mut self, record: &BigThing) -> Result<(), CacheError> {
        let inserted = self.connection.execute(
            "INSERT INTO favorites (
                id, name, location, description, rating, latitude, longitude, image, is_visited
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.name,
                record.location,
                record.description,
                record.rating,
                record.latitude,
                record.longitude,
                record.image,
                record.is_visited(),
            ],
        );
        match inserted {
            Ok(_) => {
                debug!("cached favorite {}", record.id);
                Ok(())
            }
            Err(err) if is_duplicate_key(&err) => Err(CacheError::DuplicateFavorite {
                id: record.id.clone(),
            }),
            Err(err) => Err(storage("insert favorite")(err)),
        }
    }

    fn list_favorites(&self) -> Result<Vec<BigThing>, CacheError> {
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, name, location, description, rating, latitude, longitude, image, is_visited
                 FROM favorites ORDER BY rowid",
            )
            .map_err(storage("prepare favorites query"))?;
        let rows = statement
            .query_map([], |row| {
                Ok(BigThing {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location: row.get(2)?,
                    description: row.get(3)?,
                    rating: row.get(4)?,
                    latitude: row.get(5)?,
                    longitude: row.get(6)?,
                    image: row.get(7)?,
                    favorite: Some(true),
                    visited: Some(row.get(8)?),
                    rated: None,
                })
            })
            .map_err(storage("query favorites"))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(storage("read favorite row"))
    }

    fn rating(&self, id: &str) -> Result<Option<f64>, CacheError> {
        self.connection
            .query_row("SELECT rating FROM ratings WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage("look up rating"))
    }

    fn add_rating(&mut self, id: &str, value: f64) -> Result<(), CacheError> {
        match self.connection.execute(
            "INSERT INTO ratings (id, rating) VALUES (?1, ?2)",
            params![id, value],
        ) {
            Ok(_) => {
                debug!("cached rating {value} for {id}");
                Ok(())
            }
            Err(err) if is_duplicate_key(&err) => Err(CacheError::DuplicateRating {
                id: id.to_owned(),
            }),
            Err(err) => Err(storage("insert rating")(err)),
        }
    }

    fn reset(&mut self) -> Result<(), CacheError> {
        self.recreate().map_err(|err| CacheError::Storage {
            operation: "reset cache",
            message: err.to_string(),
        })?;
        info!(
            "local cache recreated at {}",
            self.location.display_path().display()
        );
        Ok(())
    }
}
