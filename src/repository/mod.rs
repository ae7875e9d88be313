// ==========================================
// Manufacturing Scheduler - Repository layer
// ==========================================
// Data access over rusqlite. Repositories hold no business logic;
// the engines operate on loaded entities only.
// ==========================================

pub mod error;
pub mod machine_repo;
pub mod order_repo;
pub mod schedule_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use machine_repo::MachineRepository;
pub use order_repo::OrderRepository;
pub use schedule_repo::ScheduleRepository;

use chrono::NaiveDateTime;

/// Timestamp text format used by every table.
///
/// `%.f` keeps sub-second precision while still parsing values that
/// carry no fraction; lexicographic order equals chronological order.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) fn format_ts(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_ts(raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        RepositoryError::ValidationError(format!("invalid timestamp '{}': {}", raw, e))
    })
}

pub(crate) fn parse_opt_ts(raw: Option<String>) -> RepositoryResult<Option<NaiveDateTime>> {
    match raw {
        Some(s) => Ok(Some(parse_ts(&s)?)),
        None => Ok(None),
    }
}
