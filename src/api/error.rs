// ==========================================
// Manufacturing Scheduler - API layer error types
// ==========================================
// Wraps engine and repository errors; every message carries an
// explicit reason.
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("schedule not found: schedule_id={schedule_id}")]
    ScheduleNotFound { schedule_id: i64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
