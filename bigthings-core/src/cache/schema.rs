use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `cache_schema_version` by this build.
pub const CACHE_SCHEMA_VERSION: i64 = 1;

/// Create the favorites and ratings tables inside `connection`.
///
/// Identifiers are primary keys, so the database itself rejects a second
/// favorite or rating for the same record. Existing stores must already match
/// [`CACHE_SCHEMA_VERSION`].
pub(crate) fn initialise_schema(connection: &mut Connection) -> Result<(), CacheSchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| CacheSchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| CacheSchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), CacheSchemaError> {
    run_migration_step(
        transaction,
        "create favorites",
        "CREATE TABLE IF NOT EXISTS favorites (
            id TEXT PRIMARY KEY NOT NULL CHECK (length(trim(id)) > 0),
            name TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            rating TEXT NOT NULL DEFAULT '',
            latitude TEXT NOT NULL DEFAULT '',
            longitude TEXT NOT NULL DEFAULT '',
            image TEXT NOT NULL DEFAULT '',
            is_visited INTEGER NOT NULL DEFAULT 0
        )",
    )?;
    run_migration_step(
        transaction,
        "create ratings",
        "CREATE TABLE IF NOT EXISTS ratings (
            id TEXT PRIMARY KEY NOT NULL CHECK (length(trim(id)) > 0),
            rating REAL NOT NULL,
            votes TEXT NOT NULL DEFAULT '1'
        ) WITHOUT ROWID",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), CacheSchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS cache_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM cache_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| CacheSchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == CACHE_SCHEMA_VERSION => Ok(()),
        Some(found) => Err(CacheSchemaError::VersionMismatch {
            expected: CACHE_SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO cache_schema_version (version) VALUES (?1)",
                [CACHE_SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| CacheSchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), CacheSchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| CacheSchemaError::Migration { step, source })
}

/// Errors raised when initialising the cache schema.
#[derive(Debug, Error)]
pub enum CacheSchemaError {
    /// A schema statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// The failing step.
        step: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The store was created by an incompatible build.
    #[error("expected cache schema version {expected} but found {found}; reset the cache")]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the store.
        found: i64,
    },
}
