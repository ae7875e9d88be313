// ==========================================
// Manufacturing Scheduler - Domain layer
// ==========================================
// Passive entities and closed status types. No data access, no
// engine logic; derived values are pure functions over the entity.
// ==========================================

pub mod interpretation;
pub mod machine;
pub mod order;
pub mod schedule;
pub mod types;

// Core type re-exports
pub use interpretation::{ScheduleChange, SchedulingInterpretation};
pub use machine::{Machine, MaintenanceWindow, ProductCapability};
pub use order::{MaterialRequirement, ProductionOrder};
pub use schedule::{Schedule, ScheduleItem, ScheduleSummary};
pub use types::{OrderStatus, ScheduleItemStatus};
