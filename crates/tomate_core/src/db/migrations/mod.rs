//! Versioned schema steps for the tomato store.
//!
//! Each step runs in its own transaction together with the
//! `user_version` bump, so an interrupted upgrade resumes from the last
//! committed step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, sql)` pairs in ascending version order.
const SCHEMA_STEPS: [(u32, &str); 2] = [
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_activity_histories.sql")),
];

/// Schema version written by this build.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Schema version recorded in `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Runs every step newer than the recorded version.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] for databases from newer builds.
/// - [`DbError::Migration`] naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    for (version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > from) {
        run_step(conn, *version, sql).map_err(|source| DbError::Migration {
            version: *version,
            source,
        })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    Ok(())
}

fn run_step(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}
