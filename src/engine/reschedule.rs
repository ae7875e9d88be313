// ==========================================
// Manufacturing Scheduler - Rescheduler
// ==========================================
// Translates the whole timeline by a constant offset so the earliest
// item starts at now + restart lead. Planned windows of every item
// move, including terminal ones (their actual timestamps stay put);
// no recalculation follows, the shift is assumed sufficient.
// ==========================================

use crate::config::SchedulingOptions;
use crate::domain::schedule::Schedule;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDateTime};
use tracing::instrument;

// ==========================================
// RestartOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct RestartOutcome {
    pub new_start_time: NaiveDateTime,
    pub shift_minutes: i64,
}

// ==========================================
// Rescheduler
// ==========================================
pub struct Rescheduler {
    lead: Duration,
}

impl Rescheduler {
    pub fn new(options: &SchedulingOptions) -> Self {
        Self {
            lead: options.restart_lead(),
        }
    }

    /// Shift every item so the earliest planned start lands at
    /// now + restart lead. Durations are preserved under translation.
    #[instrument(skip(self, schedule), fields(schedule_id = schedule.id, items = schedule.items.len()))]
    pub fn restart_now(
        &self,
        schedule: &mut Schedule,
        now: NaiveDateTime,
    ) -> EngineResult<RestartOutcome> {
        let earliest_start = schedule
            .items
            .iter()
            .map(|i| i.start_time)
            .min()
            .ok_or(EngineError::EmptySchedule)?;

        let new_start_time = now + self.lead;
        let shift = new_start_time - earliest_start;

        tracing::info!(
            shift_minutes = shift.num_minutes(),
            %new_start_time,
            "shifting schedule to start now"
        );

        for item in &mut schedule.items {
            item.start_time += shift;
            item.end_time += shift;
        }

        schedule.explanation = Some(format!(
            "Schedule rescheduled to start immediately at {}. Ready for production.",
            new_start_time.format("%m/%d %H:%M"),
        ));
        if !schedule.created_by.ends_with("(Rescheduled)") {
            schedule.created_by.push_str(" (Rescheduled)");
        }

        Ok(RestartOutcome {
            new_start_time,
            shift_minutes: shift.num_minutes(),
        })
    }
}
