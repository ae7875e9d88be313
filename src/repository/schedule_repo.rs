// ==========================================
// Manufacturing Scheduler - Schedule repository
// ==========================================
// Keyed store (schedule id -> schedule) with a documented
// "current = most recently created" query. Save is an upsert by id;
// items are replaced wholesale since a schedule exclusively owns them.
// ==========================================

use crate::domain::schedule::{Schedule, ScheduleItem};
use crate::domain::types::ScheduleItemStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_ts, parse_opt_ts, parse_ts};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleRepository
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Upsert a schedule by id, replacing its items.
    pub fn save(&self, schedule: &Schedule) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO schedule (id, created_at, created_by, explanation)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   created_at = excluded.created_at,
                   created_by = excluded.created_by,
                   explanation = excluded.explanation"#,
            params![
                schedule.id,
                format_ts(schedule.created_at),
                &schedule.created_by,
                &schedule.explanation,
            ],
        )?;

        tx.execute(
            "DELETE FROM schedule_item WHERE schedule_id = ?",
            params![schedule.id],
        )?;

        for item in &schedule.items {
            tx.execute(
                r#"INSERT INTO schedule_item (
                    schedule_id, item_id, order_id, machine_id,
                    start_time, end_time, planned_quantity,
                    product_name, machine_name, status,
                    actual_start_time, actual_end_time, actual_quantity, notes
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    schedule.id,
                    item.id,
                    item.order_id,
                    item.machine_id,
                    format_ts(item.start_time),
                    format_ts(item.end_time),
                    item.planned_quantity,
                    &item.product_name,
                    &item.machine_name,
                    item.status.as_str(),
                    item.actual_start_time.map(format_ts),
                    item.actual_end_time.map(format_ts),
                    item.actual_quantity,
                    &item.notes,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn find_by_id(&self, schedule_id: i64) -> RepositoryResult<Option<Schedule>> {
        let conn = self.get_conn()?;
        let mut found = self.load_one(&conn, "WHERE id = ?", Some(schedule_id))?;
        Ok(found.pop())
    }

    /// Most recently created schedule, or a fresh empty schedule with
    /// id=1 when none has been saved yet.
    pub fn get_current(&self, now: NaiveDateTime) -> RepositoryResult<Schedule> {
        let conn = self.get_conn()?;
        let mut found = self.load_one(&conn, "ORDER BY created_at DESC, id DESC LIMIT 1", None)?;

        match found.pop() {
            Some(schedule) => Ok(schedule),
            None => Ok(Schedule::empty(1, "System", now)),
        }
    }

    /// Next free schedule id (max + 1, starting at 1).
    pub fn next_schedule_id(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let max: Option<i64> =
            conn.query_row("SELECT MAX(id) FROM schedule", [], |row| row.get(0))?;
        Ok(max.unwrap_or(0) + 1)
    }

    pub fn delete(&self, schedule_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        // schedule_item rows cascade
        conn.execute("DELETE FROM schedule WHERE id = ?", params![schedule_id])?;
        Ok(())
    }

    /// Delete several schedules in one transaction, returning how many
    /// existed. All or nothing: a failing delete rolls the batch back.
    pub fn batch_delete(&self, schedule_ids: &[i64]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut deleted = 0usize;
        for id in schedule_ids {
            deleted += tx.execute("DELETE FROM schedule WHERE id = ?", params![id])?;
        }

        tx.commit()?;
        Ok(deleted)
    }

    /// Last `count` schedules by creation time, optionally filtered by
    /// a case-insensitive creator substring and an upper creation bound.
    pub fn list_recent(
        &self,
        count: usize,
        created_by_filter: Option<&str>,
        created_before: Option<NaiveDateTime>,
    ) -> RepositoryResult<Vec<Schedule>> {
        let conn = self.get_conn()?;

        let mut sql = String::from("SELECT id FROM schedule WHERE 1=1");
        let mut args: Vec<String> = Vec::new();

        if let Some(filter) = created_by_filter {
            sql.push_str(" AND LOWER(created_by) LIKE '%' || LOWER(?) || '%'");
            args.push(filter.to_string());
        }
        if let Some(before) = created_before {
            sql.push_str(" AND created_at < ?");
            args.push(format_ts(before));
        }
        // count is a plain usize, safe to splice
        sql.push_str(&format!(" ORDER BY created_at DESC, id DESC LIMIT {}", count));

        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                row.get::<_, i64>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut schedules = Vec::with_capacity(ids.len());
        for id in ids {
            let mut found = self.load_one(&conn, "WHERE id = ?", Some(id))?;
            if let Some(s) = found.pop() {
                schedules.push(s);
            }
        }
        Ok(schedules)
    }

    // ==========================================
    // Row mapping
    // ==========================================

    fn load_one(
        &self,
        conn: &Connection,
        clause: &str,
        id: Option<i64>,
    ) -> RepositoryResult<Vec<Schedule>> {
        let sql = format!(
            "SELECT id, created_at, created_by, explanation FROM schedule {}",
            clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = match id {
            Some(id) => stmt
                .query_map(params![id], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut schedules = Vec::with_capacity(rows.len());
        for (id, created_at, created_by, explanation) in rows {
            schedules.push(Schedule {
                id,
                created_at: parse_ts(&created_at)?,
                created_by,
                items: self.load_items(conn, id)?,
                explanation,
            });
        }
        Ok(schedules)
    }

    fn load_items(&self, conn: &Connection, schedule_id: i64) -> RepositoryResult<Vec<ScheduleItem>> {
        let mut stmt = conn.prepare(
            r#"SELECT item_id, order_id, machine_id, start_time, end_time,
                      planned_quantity, product_name, machine_name, status,
                      actual_start_time, actual_end_time, actual_quantity, notes
               FROM schedule_item
               WHERE schedule_id = ?
               ORDER BY item_id"#,
        )?;

        let rows = stmt
            .query_map(params![schedule_id], |row| {
                Ok(RawItemRow {
                    item_id: row.get(0)?,
                    order_id: row.get(1)?,
                    machine_id: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    planned_quantity: row.get(5)?,
                    product_name: row.get(6)?,
                    machine_name: row.get(7)?,
                    status: row.get(8)?,
                    actual_start_time: row.get(9)?,
                    actual_end_time: row.get(10)?,
                    actual_quantity: row.get(11)?,
                    notes: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for raw in rows {
            let status = ScheduleItemStatus::parse(&raw.status).ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "unknown schedule item status '{}' for item {}",
                    raw.status, raw.item_id
                ))
            })?;

            items.push(ScheduleItem {
                id: raw.item_id,
                order_id: raw.order_id,
                machine_id: raw.machine_id,
                start_time: parse_ts(&raw.start_time)?,
                end_time: parse_ts(&raw.end_time)?,
                planned_quantity: raw.planned_quantity,
                product_name: raw.product_name,
                machine_name: raw.machine_name,
                status,
                actual_start_time: parse_opt_ts(raw.actual_start_time)?,
                actual_end_time: parse_opt_ts(raw.actual_end_time)?,
                actual_quantity: raw.actual_quantity,
                notes: raw.notes,
            });
        }
        Ok(items)
    }
}

struct RawItemRow {
    item_id: i64,
    order_id: i64,
    machine_id: i64,
    start_time: String,
    end_time: String,
    planned_quantity: i64,
    product_name: Option<String>,
    machine_name: Option<String>,
    status: String,
    actual_start_time: Option<String>,
    actual_end_time: Option<String>,
    actual_quantity: Option<i64>,
    notes: Option<String>,
}
