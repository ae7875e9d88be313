// ==========================================
// Manufacturing Scheduler - API layer
// ==========================================
// Business facade over repositories, engines and the explanation
// service. The transport layer (HTTP, CLI, ...) lives outside this
// crate and calls into SchedulingApi.
// ==========================================

pub mod error;
pub mod scheduling_api;

pub use error::{ApiError, ApiResult};
pub use scheduling_api::{SchedulingApi, DEFAULT_EXPLANATION_TIMEOUT_MS};
