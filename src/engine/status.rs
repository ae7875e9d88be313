// ==========================================
// Manufacturing Scheduler - Status transition handler
// ==========================================
// Applies a validated status change to one schedule item, auto-stamps
// actual timestamps, and triggers recalculation when the change
// affects the remaining timeline.
// ==========================================

use crate::domain::schedule::Schedule;
use crate::domain::types::ScheduleItemStatus;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::recalc::RecalcEngine;
use chrono::NaiveDateTime;
use tracing::instrument;

// ==========================================
// StatusChange - requested change for one item
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StatusChange {
    pub status: Option<ScheduleItemStatus>,
    pub actual_start_time: Option<NaiveDateTime>,
    pub actual_end_time: Option<NaiveDateTime>,
    pub actual_quantity: Option<i64>,
    pub notes: Option<String>,
}

impl StatusChange {
    pub fn to_status(status: ScheduleItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

// ==========================================
// StatusOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct StatusOutcome {
    pub item_id: i64,
    pub status: ScheduleItemStatus,
    pub previous_end_date: NaiveDateTime,
    pub new_end_date: NaiveDateTime,
    /// Whether the change triggered a recalculation pass.
    pub recalculated: bool,
}

impl StatusOutcome {
    pub fn minutes_saved(&self) -> i64 {
        (self.previous_end_date - self.new_end_date).num_minutes()
    }
}

// ==========================================
// StatusTransitionHandler
// ==========================================
pub struct StatusTransitionHandler {
    recalc: RecalcEngine,
}

impl StatusTransitionHandler {
    pub fn new(recalc: RecalcEngine) -> Self {
        Self { recalc }
    }

    /// Apply a status change to one item.
    ///
    /// Fails with `ItemNotFound` for an unknown item id and with
    /// `InvalidStatusTransition` when leaving a terminal state; both
    /// failures leave the schedule untouched. Auto-stamping rules:
    /// actual start on entering InProgress, actual end on entering
    /// Completed (both only when absent and not supplied), actual
    /// quantity defaults to the planned quantity, notes overwrite only
    /// when non-blank. Timeline-relevant statuses (Completed,
    /// Cancelled, InProgress, Delayed) trigger recalculation.
    #[instrument(skip(self, schedule, change), fields(schedule_id = schedule.id, item_id))]
    pub fn apply_status(
        &self,
        schedule: &mut Schedule,
        item_id: i64,
        change: StatusChange,
        now: NaiveDateTime,
    ) -> EngineResult<StatusOutcome> {
        // validate before mutating anything
        let current_status = schedule
            .item_by_id(item_id)
            .ok_or(EngineError::ItemNotFound { item_id })?
            .status;

        let new_status = change.status.unwrap_or(current_status);
        if !current_status.can_transition_to(new_status) {
            return Err(EngineError::InvalidStatusTransition {
                item_id,
                from: current_status,
                to: new_status,
            });
        }

        let previous_end_date = schedule.estimated_end_date(now);

        let item = schedule
            .item_by_id_mut(item_id)
            .expect("item presence checked above");

        item.status = new_status;

        if let Some(start) = change.actual_start_time {
            item.actual_start_time = Some(start);
        } else if new_status == ScheduleItemStatus::InProgress && item.actual_start_time.is_none() {
            item.actual_start_time = Some(now);
        }

        if let Some(end) = change.actual_end_time {
            item.actual_end_time = Some(end);
        } else if new_status == ScheduleItemStatus::Completed && item.actual_end_time.is_none() {
            item.actual_end_time = Some(now);
        }

        item.actual_quantity = change.actual_quantity.or(Some(item.planned_quantity));

        if let Some(notes) = change.notes {
            if !notes.trim().is_empty() {
                item.notes = Some(notes);
            }
        }

        tracing::info!(item_id, from = %current_status, to = %new_status, "status applied");

        if new_status.triggers_recalc() {
            let outcome = self.recalc.recalculate(schedule, now);
            Ok(StatusOutcome {
                item_id,
                status: new_status,
                previous_end_date,
                new_end_date: outcome.new_end_date,
                recalculated: true,
            })
        } else {
            Ok(StatusOutcome {
                item_id,
                status: new_status,
                previous_end_date,
                new_end_date: schedule.estimated_end_date(now),
                recalculated: false,
            })
        }
    }

    /// Completion shortcut: the most frequent caller-initiated
    /// transition, always recalculating. Equivalent to `apply_status`
    /// with Completed and `actual_end_time = completion_time`.
    pub fn complete_item(
        &self,
        schedule: &mut Schedule,
        item_id: i64,
        actual_quantity: Option<i64>,
        completion_time: Option<NaiveDateTime>,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> EngineResult<StatusOutcome> {
        self.apply_status(
            schedule,
            item_id,
            StatusChange {
                status: Some(ScheduleItemStatus::Completed),
                actual_start_time: None,
                actual_end_time: completion_time,
                actual_quantity,
                notes,
            },
            now,
        )
    }
}
