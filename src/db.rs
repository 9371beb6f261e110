// ==========================================
// FleetFlow - SQLite connection setup
// ==========================================
// Every connection gets the same PRAGMAs (foreign keys + busy_timeout);
// the schema is bootstrapped idempotently from store/schema.sql
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version expected by this build
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = include_str!("store/schema.sql");

/// Apply the shared PRAGMAs.
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// Open a connection with the default busy_timeout
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    open_sqlite_connection_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT_MS)
}

pub fn open_sqlite_connection_with_timeout(
    db_path: &str,
    busy_timeout_ms: u64,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn, busy_timeout_ms)?;
    Ok(conn)
}

/// Create tables, indexes and triggers if missing, then stamp the version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_overlap_trigger_aborts_with_code() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
        init_schema(&conn).unwrap();

        conn.execute_batch(
            r#"
            INSERT INTO equipment_groups (id, name) VALUES ('g1', 'Excavators');
            INSERT INTO assets (asset_code, group_id) VALUES ('EX-01', 'g1');
            INSERT INTO allocations (id, asset_code, group_id, start_date, end_date)
            VALUES ('a1', 'EX-01', 'g1', '2024-01-01', '2024-01-05');
            "#,
        )
        .unwrap();

        let err = conn
            .execute(
                "INSERT INTO allocations (id, asset_code, group_id, start_date, end_date)
                 VALUES ('a2', 'EX-01', 'g1', '2024-01-05', '2024-01-06')",
                [],
            )
            .unwrap_err();
        assert!(err.to_string().contains("ALLOCATION_OVERLAP"));
    }
}
