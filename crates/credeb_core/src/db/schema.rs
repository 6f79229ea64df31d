//! Ledger schema steps.
//!
//! Step `n` in `STEPS` upgrades a database from version `n` to `n + 1`.
//! Each step commits on its own together with its `user_version` bump.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[&str] = &[
    // v1: one row per namespace-qualified collection key.
    "CREATE TABLE kv_entries (
        key TEXT PRIMARY KEY NOT NULL,
        value BLOB NOT NULL,
        updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
    );",
];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = STEPS.len() as u32;

/// Column layout of `kv_entries`, in declaration order.
pub const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Upgrades `conn` to [`SCHEMA_VERSION`].
///
/// # Errors
/// - `DbError::NewerSchema` when the file is ahead of this build.
/// - `DbError::Migrate` naming the step that failed.
pub fn migrate(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::NewerSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (index, sql) in STEPS.iter().enumerate().skip(found as usize) {
        let to_version = index as u32 + 1;
        let step = |conn: &mut Connection| -> rusqlite::Result<()> {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", to_version)?;
            tx.commit()
        };
        step(conn).map_err(|source| DbError::Migrate { to_version, source })?;
        info!("event=db_migrate module=db status=ok to_version={to_version}");
    }
    Ok(())
}

/// Confirms `kv_entries` exists with the [`KV_COLUMNS`] layout.
pub fn check_kv_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('kv_entries') ORDER BY cid;")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(DbError::MissingKvTable);
    }
    if columns != KV_COLUMNS {
        return Err(DbError::UnexpectedKvColumns(columns));
    }
    Ok(())
}
