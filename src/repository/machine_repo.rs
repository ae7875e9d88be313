// ==========================================
// Manufacturing Scheduler - Machine repository
// ==========================================
// Machines are read-only to the engine. Capabilities and maintenance
// windows are loaded alongside their machine; allocation order is
// input (id) order.
// ==========================================

use crate::domain::machine::{Machine, MaintenanceWindow, ProductCapability};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_ts, parse_ts};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// MachineRepository
// ==========================================
pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a machine together with capabilities and maintenance windows.
    pub fn insert(&self, machine: &Machine) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO machine (id, name, is_operational) VALUES (?, ?, ?)",
            params![machine.id, &machine.name, machine.is_operational],
        )?;

        for cap in &machine.product_capabilities {
            conn.execute(
                r#"INSERT INTO product_capability (
                    machine_id, product_name, setup_time_minutes, production_rate_per_hour
                ) VALUES (?, ?, ?, ?)"#,
                params![
                    machine.id,
                    &cap.product_name,
                    cap.setup_time_minutes,
                    cap.production_rate_per_hour,
                ],
            )?;
        }

        for mw in &machine.scheduled_maintenance {
            conn.execute(
                r#"INSERT INTO maintenance_window (
                    machine_id, start_time, end_time, description
                ) VALUES (?, ?, ?, ?)"#,
                params![
                    machine.id,
                    format_ts(mw.start_time),
                    format_ts(mw.end_time),
                    &mw.description,
                ],
            )?;
        }

        Ok(machine.id)
    }

    /// Machines available for allocation, in id order.
    pub fn get_operational_machines(&self) -> RepositoryResult<Vec<Machine>> {
        self.query_machines("WHERE is_operational = 1")
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Machine>> {
        self.query_machines("")
    }

    pub fn find_by_id(&self, machine_id: i64) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT id, name, is_operational FROM machine WHERE id = ?",
            params![machine_id],
            map_machine_row,
        );

        match result {
            Ok(raw) => Ok(Some(self.hydrate(&conn, raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn query_machines(&self, where_clause: &str) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, name, is_operational FROM machine {} ORDER BY id",
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_machine_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut machines = Vec::with_capacity(rows.len());
        for raw in rows {
            machines.push(self.hydrate(&conn, raw)?);
        }
        Ok(machines)
    }

    fn hydrate(&self, conn: &Connection, raw: RawMachineRow) -> RepositoryResult<Machine> {
        let mut stmt = conn.prepare(
            r#"SELECT id, product_name, setup_time_minutes, production_rate_per_hour
               FROM product_capability WHERE machine_id = ? ORDER BY id"#,
        )?;
        let product_capabilities = stmt
            .query_map(params![raw.id], |row| {
                Ok(ProductCapability {
                    id: row.get(0)?,
                    product_name: row.get(1)?,
                    setup_time_minutes: row.get(2)?,
                    production_rate_per_hour: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            r#"SELECT id, start_time, end_time, description
               FROM maintenance_window WHERE machine_id = ? ORDER BY id"#,
        )?;
        let raw_windows = stmt
            .query_map(params![raw.id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut scheduled_maintenance = Vec::with_capacity(raw_windows.len());
        for (id, start, end, description) in raw_windows {
            scheduled_maintenance.push(MaintenanceWindow {
                id,
                start_time: parse_ts(&start)?,
                end_time: parse_ts(&end)?,
                description,
            });
        }

        Ok(Machine {
            id: raw.id,
            name: raw.name,
            is_operational: raw.is_operational,
            product_capabilities,
            scheduled_maintenance,
        })
    }
}

struct RawMachineRow {
    id: i64,
    name: String,
    is_operational: bool,
}

fn map_machine_row(row: &Row<'_>) -> rusqlite::Result<RawMachineRow> {
    Ok(RawMachineRow {
        id: row.get(0)?,
        name: row.get(1)?,
        is_operational: row.get(2)?,
    })
}
