// ==========================================
// Manufacturing Scheduler - SQLite initialization
// ==========================================
// Goals:
// - Unify PRAGMA behavior for every Connection::open call site
//   (foreign keys on, shared busy_timeout)
// - Provide the schema bootstrap used by the library and tests
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must
/// be applied to every connection individually.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables used by the scheduler (idempotent).
///
/// Timestamps are stored as `%Y-%m-%d %H:%M:%S%.f` text so sub-second
/// precision survives a round trip; lexicographic order matches
/// chronological order for this format.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS production_order (
            id INTEGER PRIMARY KEY,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            due_date TEXT NOT NULL,
            customer_priority INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PLANNED'
        );

        CREATE TABLE IF NOT EXISTS material_requirement (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL REFERENCES production_order(id) ON DELETE CASCADE,
            material_id INTEGER NOT NULL,
            material_name TEXT NOT NULL,
            quantity_required INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS machine (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_operational INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS product_capability (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            machine_id INTEGER NOT NULL REFERENCES machine(id) ON DELETE CASCADE,
            product_name TEXT NOT NULL,
            setup_time_minutes INTEGER NOT NULL,
            production_rate_per_hour INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS maintenance_window (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            machine_id INTEGER NOT NULL REFERENCES machine(id) ON DELETE CASCADE,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS schedule (
            id INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL,
            explanation TEXT
        );

        CREATE TABLE IF NOT EXISTS schedule_item (
            schedule_id INTEGER NOT NULL REFERENCES schedule(id) ON DELETE CASCADE,
            item_id INTEGER NOT NULL,
            order_id INTEGER NOT NULL,
            machine_id INTEGER NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            planned_quantity INTEGER NOT NULL,
            product_name TEXT,
            machine_name TEXT,
            status TEXT NOT NULL DEFAULT 'PLANNED',
            actual_start_time TEXT,
            actual_end_time TEXT,
            actual_quantity INTEGER,
            notes TEXT,
            PRIMARY KEY (schedule_id, item_id)
        );
        "#,
    )?;

    Ok(())
}
