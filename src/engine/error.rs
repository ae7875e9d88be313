// ==========================================
// Manufacturing Scheduler - Engine error types
// ==========================================

use crate::domain::types::ScheduleItemStatus;
use thiserror::Error;

/// Engine layer errors. Every failing operation leaves the schedule
/// unmutated.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("schedule item not found: item_id={item_id}")]
    ItemNotFound { item_id: i64 },

    #[error("invalid status transition for item {item_id}: {from} -> {to}")]
    InvalidStatusTransition {
        item_id: i64,
        from: ScheduleItemStatus,
        to: ScheduleItemStatus,
    },

    #[error("schedule has no items")]
    EmptySchedule,
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
