// ==========================================
// Manufacturing Scheduler - Configuration layer
// ==========================================
// Scheduling options with code defaults, overridable through the
// config_kv table (global scope).
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Duration;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// Configuration keys (config_kv, scope 'global')
// ==========================================
pub mod config_keys {
    /// Minutes between "now" and the first item of a fresh allocation.
    pub const START_DELAY_MINUTES: &str = "scheduling/start_delay_minutes";
    /// Minutes inserted between consecutive items at allocation time.
    pub const BUFFER_MINUTES: &str = "scheduling/buffer_minutes";
    /// Minutes inserted between items during recalculation compaction.
    pub const RECALC_BUFFER_MINUTES: &str = "scheduling/recalc_buffer_minutes";
    /// Minutes between "now" and the new earliest start on restart.
    pub const RESTART_LEAD_MINUTES: &str = "scheduling/restart_lead_minutes";
    /// Whether the allocator honors the caller-requested start time.
    pub const HONOR_REQUESTED_START: &str = "scheduling/honor_requested_start";
}

// ==========================================
// SchedulingOptions - engine tuning knobs
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingOptions {
    pub start_delay_minutes: i64,
    pub buffer_minutes: i64,
    pub recalc_buffer_minutes: i64,
    pub restart_lead_minutes: i64,
    /// Off by default: the historical behavior schedules from
    /// now + start delay and records the requested start only
    /// informationally.
    pub honor_requested_start: bool,
}

impl Default for SchedulingOptions {
    fn default() -> Self {
        Self {
            start_delay_minutes: 10,
            buffer_minutes: 10,
            recalc_buffer_minutes: 30,
            restart_lead_minutes: 30,
            honor_requested_start: false,
        }
    }
}

impl SchedulingOptions {
    pub fn start_delay(&self) -> Duration {
        Duration::minutes(self.start_delay_minutes)
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.buffer_minutes)
    }

    pub fn recalc_buffer(&self) -> Duration {
        Duration::minutes(self.recalc_buffer_minutes)
    }

    pub fn restart_lead(&self) -> Duration {
        Duration::minutes(self.restart_lead_minutes)
    }
}

// ==========================================
// ConfigManager - config_kv access
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager over an existing connection.
    ///
    /// Re-applies the unified PRAGMAs to the connection (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// Read a config value from config_kv (scope 'global').
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a config value (scope 'global', upsert).
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at"#,
            params![key, value],
        )?;

        Ok(())
    }

    fn get_i64_or(&self, key: &str, default: i64) -> RepositoryResult<i64> {
        match self.get_config_value(key)? {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                RepositoryError::ValidationError(format!(
                    "config value for {} is not an integer: {}",
                    key, raw
                ))
            }),
            None => Ok(default),
        }
    }

    fn get_bool_or(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(RepositoryError::ValidationError(format!(
                    "config value for {} is not a boolean: {}",
                    key, other
                ))),
            },
            None => Ok(default),
        }
    }

    /// Load scheduling options, falling back to code defaults for
    /// any key not present in config_kv.
    pub fn scheduling_options(&self) -> RepositoryResult<SchedulingOptions> {
        let defaults = SchedulingOptions::default();

        Ok(SchedulingOptions {
            start_delay_minutes: self
                .get_i64_or(config_keys::START_DELAY_MINUTES, defaults.start_delay_minutes)?,
            buffer_minutes: self.get_i64_or(config_keys::BUFFER_MINUTES, defaults.buffer_minutes)?,
            recalc_buffer_minutes: self.get_i64_or(
                config_keys::RECALC_BUFFER_MINUTES,
                defaults.recalc_buffer_minutes,
            )?,
            restart_lead_minutes: self.get_i64_or(
                config_keys::RESTART_LEAD_MINUTES,
                defaults.restart_lead_minutes,
            )?,
            honor_requested_start: self.get_bool_or(
                config_keys::HONOR_REQUESTED_START,
                defaults.honor_requested_start,
            )?,
        })
    }
}
