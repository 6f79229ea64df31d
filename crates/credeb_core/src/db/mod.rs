//! SQLite file that backs the ledger key-value store.
//!
//! # Responsibility
//! - Open ledger database files and bring their schema up to date.
//! - Confirm a connection carries the `kv_entries` layout before use.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A database written by a newer credeb is never migrated or written.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{check_kv_schema, migrate, schema_version, KV_COLUMNS, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to prepare or use the ledger database.
#[derive(Debug)]
pub enum DbError {
    /// The ledger file could not be opened or created.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// Upgrading to `to_version` failed; the file keeps its previous version.
    Migrate {
        to_version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer credeb release.
    NewerSchema { found: u32, supported: u32 },
    /// The connection has no `kv_entries` table.
    MissingKvTable,
    /// `kv_entries` exists with columns credeb does not write.
    UnexpectedKvColumns(Vec<String>),
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open ledger database `{location}`: {source}")
            }
            Self::Migrate { to_version, source } => {
                write!(f, "ledger schema upgrade to v{to_version} failed: {source}")
            }
            Self::NewerSchema { found, supported } => write!(
                f,
                "ledger database uses schema v{found}, this build reads up to v{supported}"
            ),
            Self::MissingKvTable => {
                write!(f, "ledger database is not initialized: missing kv_entries table")
            }
            Self::UnexpectedKvColumns(columns) => write!(
                f,
                "kv_entries has columns [{}], expected [{}]",
                columns.join(", "),
                KV_COLUMNS.join(", ")
            ),
            Self::Sqlite(err) => write!(f, "ledger database error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migrate { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } | Self::MissingKvTable | Self::UnexpectedKvColumns(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
