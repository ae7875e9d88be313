// ==========================================
// Manufacturing Scheduler - Core Library
// ==========================================
// Scope: greedy allocation of orders to machines, per-item status
// tracking, and timeline recalculation when execution deviates
// from plan. Storage and the explanation service are collaborators
// behind the repository and ai layers.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities & types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - scheduling rules
pub mod engine;

// Explanation/interpretation collaborator
pub mod ai;

// Configuration layer
pub mod config;

// Database infrastructure (connection init / unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// API layer - business facade
pub mod api;

// ==========================================
// Core type re-exports
// ==========================================

// Domain types
pub use domain::types::{OrderStatus, ScheduleItemStatus};

// Domain entities
pub use domain::{
    Machine, MaintenanceWindow, MaterialRequirement, ProductCapability, ProductionOrder,
    Schedule, ScheduleChange, ScheduleItem, ScheduleSummary, SchedulingInterpretation,
};

// Engines
pub use engine::{
    AllocationResult, RecalcEngine, RecalcOutcome, Rescheduler, RestartOutcome,
    ScheduleAllocator, StatusChange, StatusOutcome, StatusTransitionHandler,
};

// API
pub use api::SchedulingApi;

// Explanation service
pub use ai::{ExplanationService, TemplatedExplanationService};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Manufacturing Scheduler";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
