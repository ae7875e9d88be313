// ==========================================
// Manufacturing Scheduler - Schedule domain model
// ==========================================
// A Schedule exclusively owns its ScheduleItems; orders and machines
// are referenced by id with optional name snapshots for display.
// Summary values (start/end dates, completion) are derived, never
// stored: they are recomputed from the item collection on access.
// ==========================================

use crate::domain::types::ScheduleItemStatus;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleItem - one order/machine assignment
// ==========================================
// Invariant: end_time >= start_time. Once the status is terminal
// (Completed/Cancelled) the planned window is historical and must not
// be moved by recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: i64, // unique within the owning schedule
    pub order_id: i64,
    pub machine_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub planned_quantity: i64,

    // Display snapshots taken at allocation time
    pub product_name: Option<String>,
    pub machine_name: Option<String>,

    // Execution tracking
    pub status: ScheduleItemStatus,
    pub actual_start_time: Option<NaiveDateTime>,
    pub actual_end_time: Option<NaiveDateTime>,
    pub actual_quantity: Option<i64>,
    pub notes: Option<String>,
}

impl ScheduleItem {
    pub fn planned_duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn actual_duration(&self) -> Option<Duration> {
        match (self.actual_start_time, self.actual_end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Observed end when present, planned end otherwise.
    pub fn effective_end_time(&self) -> NaiveDateTime {
        self.actual_end_time.unwrap_or(self.end_time)
    }

    pub fn is_ahead_of_schedule(&self) -> bool {
        matches!(self.actual_end_time, Some(actual) if actual < self.end_time)
    }

    pub fn is_behind_schedule(&self) -> bool {
        matches!(self.actual_end_time, Some(actual) if actual > self.end_time)
    }

    /// Display label for the scheduled order.
    pub fn order_label(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("Order {}", self.order_id))
    }
}

// ==========================================
// Schedule - ordered set of assignments plus summary state
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub items: Vec<ScheduleItem>,
    pub explanation: Option<String>,
}

impl Schedule {
    /// Fresh empty schedule, as handed out when no schedule exists yet.
    pub fn empty(id: i64, created_by: &str, now: NaiveDateTime) -> Self {
        Self {
            id,
            created_at: now,
            created_by: created_by.to_string(),
            items: Vec::new(),
            explanation: None,
        }
    }

    pub fn item_by_id(&self, item_id: i64) -> Option<&ScheduleItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_by_id_mut(&mut self, item_id: i64) -> Option<&mut ScheduleItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn item_by_order_id_mut(&mut self, order_id: i64) -> Option<&mut ScheduleItem> {
        self.items.iter_mut().find(|i| i.order_id == order_id)
    }

    /// Next free item id (item ids are dense, starting at 1).
    pub fn next_item_id(&self) -> i64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    // ==========================================
    // Derived summary values
    // ==========================================

    /// Earliest planned start, or `now` for an empty schedule.
    pub fn estimated_start_date(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.items
            .iter()
            .map(|i| i.start_time)
            .min()
            .unwrap_or(now)
    }

    /// End date of the remaining timeline.
    ///
    /// Active items (neither Completed nor Cancelled) dominate: the end
    /// date is their latest planned end. With no active items left the
    /// end date falls back to the latest completion among Completed
    /// items (actual end preferred), and to `now` when nothing is
    /// active or completed.
    pub fn estimated_end_date(&self, now: NaiveDateTime) -> NaiveDateTime {
        if self.items.is_empty() {
            return now;
        }

        let active_end = self
            .items
            .iter()
            .filter(|i| i.status.is_active())
            .map(|i| i.end_time)
            .max();
        if let Some(end) = active_end {
            return end;
        }

        self.items
            .iter()
            .filter(|i| i.status == ScheduleItemStatus::Completed)
            .map(|i| i.effective_end_time())
            .max()
            .unwrap_or(now)
    }

    pub fn estimated_duration(&self, now: NaiveDateTime) -> Duration {
        self.estimated_end_date(now) - self.estimated_start_date(now)
    }

    /// Completed items over total, in percent; 0 for an empty schedule.
    pub fn completion_percentage(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.completed_items() as f64 / self.items.len() as f64 * 100.0
    }

    pub fn count_by_status(&self, status: ScheduleItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn completed_items(&self) -> usize {
        self.count_by_status(ScheduleItemStatus::Completed)
    }

    pub fn pending_items(&self) -> usize {
        self.count_by_status(ScheduleItemStatus::Planned)
    }

    pub fn in_progress_items(&self) -> usize {
        self.count_by_status(ScheduleItemStatus::InProgress)
    }

    pub fn delayed_items(&self) -> usize {
        self.count_by_status(ScheduleItemStatus::Delayed)
    }

    pub fn cancelled_items(&self) -> usize {
        self.count_by_status(ScheduleItemStatus::Cancelled)
    }
}

// ==========================================
// ScheduleSummary - progress report for one schedule
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub schedule_id: i64,
    pub original_end_date: NaiveDateTime,
    pub current_end_date: NaiveDateTime,
    pub time_saved_minutes: i64,
    pub completion_percentage: f64,
    pub completed_items: usize,
    pub total_items: usize,
    pub completed_order_names: Vec<String>,
    pub remaining_order_names: Vec<String>,
}
