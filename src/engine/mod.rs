// ==========================================
// Manufacturing Scheduler - Engine layer
// ==========================================
// Scheduling rules over in-memory schedules. Engines never touch the
// database and never call the explanation service; both belong to
// the API layer.
// ==========================================

pub mod allocator;
pub mod error;
pub mod recalc;
pub mod reschedule;
pub mod status;

// Core engine re-exports
pub use allocator::{AllocationResult, ScheduleAllocator};
pub use error::{EngineError, EngineResult};
pub use recalc::{RecalcEngine, RecalcOutcome};
pub use reschedule::{Rescheduler, RestartOutcome};
pub use status::{StatusChange, StatusOutcome, StatusTransitionHandler};
