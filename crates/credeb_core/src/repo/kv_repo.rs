//! Key-value repository contract with in-memory and SQLite backends.
//!
//! # Responsibility
//! - Store opaque byte values under string keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `get` distinguishes "absent" (`Ok(None)`) from backend failure.
//! - `set_batch` on SQLite writes every entry or none.

use crate::db::{check_kv_schema, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error raised by key-value repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A collection could not be serialized before writing.
    Encode { key: String, message: String },
    /// Backend refused the operation (read-only media, quota, ...).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, message } => write!(f, "failed to encode `{key}`: {message}"),
            Self::Unavailable(message) => write!(f, "ledger storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable byte store keyed by string.
pub trait KvRepository {
    /// Returns the stored bytes, or `None` when the key was never written.
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;

    /// Writes (or replaces) one value.
    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()>;

    /// Writes several values. Backends that support it make this atomic.
    fn set_batch(&mut self, entries: &[(String, Vec<u8>)]) -> RepoResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Process-local repository backed by an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKvRepository {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored keys in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// SQLite-backed repository over the `kv_entries` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that did not go through `open_db`/`open_db_in_memory`
    /// with `DbError::MissingKvTable` or `DbError::UnexpectedKvColumns`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        check_kv_schema(conn)?;
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        upsert(&*self.conn, key, value)?;
        Ok(())
    }

    fn set_batch(&mut self, entries: &[(String, Vec<u8>)]) -> RepoResult<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &[u8]) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at)
         VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key, value],
    )
}

#[cfg(test)]
mod tests {
    use super::{KvRepository, MemoryKvRepository};

    #[test]
    fn memory_repository_distinguishes_absent_from_empty() {
        let mut repo = MemoryKvRepository::new();
        assert_eq!(repo.get("k").unwrap(), None);

        repo.set("k", b"").unwrap();
        assert_eq!(repo.get("k").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn default_batch_writes_every_entry() {
        let mut repo = MemoryKvRepository::new();
        repo.set_batch(&[
            ("a".to_string(), b"1".to_vec()),
            ("b".to_string(), b"2".to_vec()),
        ])
        .unwrap();

        assert_eq!(repo.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(repo.get("b").unwrap(), Some(b"2".to_vec()));
    }
}
