// ==========================================
// Manufacturing Scheduler - Order domain model
// ==========================================
// Orders are created externally and read-only to the engine.
// Material requirements are informational: they are carried for
// display but never consulted by the allocator.
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// MaterialRequirement - per-order bill of materials line
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub id: i64,
    pub material_id: i64,
    pub material_name: String,
    pub quantity_required: i64,
}

// ==========================================
// ProductionOrder - manufacturing order
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub due_date: NaiveDateTime,
    pub customer_priority: i32, // higher = more urgent
    pub status: OrderStatus,
    pub required_materials: Vec<MaterialRequirement>,
}

impl ProductionOrder {
    /// Whether the order belongs to the allocator's input set.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
