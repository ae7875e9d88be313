// ==========================================
// Manufacturing Scheduler - Machine domain model
// ==========================================
// Machines are read-only to the engine. Maintenance windows are
// informational only and not enforced as allocation constraints.
// ==========================================

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductCapability - what a machine can produce, and how fast
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCapability {
    pub id: i64,
    pub product_name: String,
    pub setup_time_minutes: i64,
    pub production_rate_per_hour: i64,
}

impl ProductCapability {
    pub fn setup_duration(&self) -> Duration {
        Duration::minutes(self.setup_time_minutes)
    }

    /// Production time for a quantity at this capability's rate,
    /// rounded to whole seconds.
    ///
    /// Callers must not reach this with a non-positive rate;
    /// `Machine::capability_for` filters those out.
    pub fn production_duration(&self, quantity: i64) -> Duration {
        debug_assert!(self.production_rate_per_hour > 0);
        let hours = quantity as f64 / self.production_rate_per_hour as f64;
        Duration::seconds((hours * 3600.0).round() as i64)
    }

    /// Setup plus production time for a quantity.
    pub fn total_duration(&self, quantity: i64) -> Duration {
        self.setup_duration() + self.production_duration(quantity)
    }
}

// ==========================================
// MaintenanceWindow - planned downtime (informational)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
}

// ==========================================
// Machine - production machine
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: i64,
    pub name: String,
    pub is_operational: bool,
    pub product_capabilities: Vec<ProductCapability>,
    pub scheduled_maintenance: Vec<MaintenanceWindow>,
}

impl Machine {
    /// First capability matching the product name, case-insensitive.
    ///
    /// Capabilities with a non-positive production rate are treated as
    /// data errors and skipped, so a zero rate can never produce an
    /// unbounded duration downstream.
    pub fn capability_for(&self, product_name: &str) -> Option<&ProductCapability> {
        self.product_capabilities
            .iter()
            .find(|c| c.product_name.eq_ignore_ascii_case(product_name) && c.production_rate_per_hour > 0)
    }

    pub fn can_produce(&self, product_name: &str) -> bool {
        self.capability_for(product_name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_with(caps: Vec<ProductCapability>) -> Machine {
        Machine {
            id: 1,
            name: "CNC-01".to_string(),
            is_operational: true,
            product_capabilities: caps,
            scheduled_maintenance: vec![],
        }
    }

    #[test]
    fn capability_match_is_case_insensitive() {
        let m = machine_with(vec![ProductCapability {
            id: 1,
            product_name: "Widget A".to_string(),
            setup_time_minutes: 10,
            production_rate_per_hour: 50,
        }]);
        assert!(m.can_produce("widget a"));
        assert!(m.can_produce("WIDGET A"));
        assert!(!m.can_produce("Widget B"));
    }

    #[test]
    fn zero_rate_capability_is_ignored() {
        let m = machine_with(vec![ProductCapability {
            id: 1,
            product_name: "Widget A".to_string(),
            setup_time_minutes: 10,
            production_rate_per_hour: 0,
        }]);
        assert!(!m.can_produce("Widget A"));
    }

    #[test]
    fn durations_from_capability() {
        let cap = ProductCapability {
            id: 1,
            product_name: "Widget A".to_string(),
            setup_time_minutes: 10,
            production_rate_per_hour: 50,
        };
        // 100 units at 50/hr = 2h production, +10min setup
        assert_eq!(cap.total_duration(100), Duration::minutes(130));
    }
}
