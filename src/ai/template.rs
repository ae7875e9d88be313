// ==========================================
// Manufacturing Scheduler - Templated explanations
// ==========================================
// Deterministic explanation text. Used directly as the fallback when
// the external service fails or times out, and wrapped in
// TemplatedExplanationService as a complete no-network implementation
// for tests and offline deployments.
// ==========================================

use crate::ai::{ExplanationResult, ExplanationService};
use crate::domain::interpretation::SchedulingInterpretation;
use crate::domain::schedule::Schedule;
use async_trait::async_trait;
use chrono::NaiveDateTime;

const TIME_FMT: &str = "%m/%d %H:%M";

/// Deterministic explanation of a status change's end-date impact.
pub fn status_change_explanation(
    item_id: i64,
    previous_end: NaiveDateTime,
    new_end: NaiveDateTime,
) -> String {
    let saved_minutes = (previous_end - new_end).num_minutes();
    let hours = saved_minutes.abs() as f64 / 60.0;

    if saved_minutes > 0 {
        format!(
            "Item {} updated early. Schedule updated - saved {:.1} hours. New end date: {}",
            item_id,
            hours,
            new_end.format(TIME_FMT)
        )
    } else if saved_minutes < 0 {
        format!(
            "Item {} updated late. Schedule updated - added {:.1} hours. New end date: {}",
            item_id,
            hours,
            new_end.format(TIME_FMT)
        )
    } else {
        format!(
            "Item {} updated on time. New end date: {}",
            item_id,
            new_end.format(TIME_FMT)
        )
    }
}

/// Deterministic schedule analysis used when the service is down.
pub fn analysis_unavailable(schedule: &Schedule) -> String {
    format!(
        "Schedule contains {} items ({:.1}% complete). Analysis temporarily unavailable.",
        schedule.items.len(),
        schedule.completion_percentage()
    )
}

/// Explanation text for a failed interpretation call.
pub fn interpretation_unavailable() -> String {
    "Unable to interpret the request; the schedule was left unchanged.".to_string()
}

// ==========================================
// TemplatedExplanationService
// ==========================================

/// Explanation service that answers from templates only. Never fails,
/// never suspends, never suggests changes.
#[derive(Debug, Default)]
pub struct TemplatedExplanationService;

impl TemplatedExplanationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExplanationService for TemplatedExplanationService {
    async fn generate_explanation(&self, prompt: &str) -> ExplanationResult<String> {
        // no model behind this implementation; echo a neutral summary
        let first_line = prompt.lines().next().unwrap_or_default();
        Ok(format!("Schedule updated. {}", first_line))
    }

    async fn interpret_request(
        &self,
        _prompt: &str,
        _schedule: &Schedule,
    ) -> ExplanationResult<SchedulingInterpretation> {
        Ok(SchedulingInterpretation::invalid(interpretation_unavailable()))
    }

    async fn analyze_schedule(
        &self,
        _prompt: &str,
        schedule: &Schedule,
    ) -> ExplanationResult<String> {
        Ok(analysis_unavailable(schedule))
    }
}
