// ==========================================
// Manufacturing Scheduler - Prompt builders
// ==========================================
// Structured schedule digests for the explanation service. The item
// listing is grouped by status and spells out which groups may be
// rescheduled, so the service cannot suggest moving finished work.
// ==========================================

use crate::domain::schedule::Schedule;
use crate::domain::types::ScheduleItemStatus;
use chrono::NaiveDateTime;
use std::fmt::Write;

const TIME_FMT: &str = "%m/%d %H:%M";

/// Digest of the schedule used as shared context by every prompt.
fn schedule_digest(schedule: &Schedule) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Current schedule information:");
    let _ = writeln!(out, "- Schedule ID: {}", schedule.id);
    let _ = writeln!(
        out,
        "- Created: {} by {}",
        schedule.created_at.format(TIME_FMT),
        schedule.created_by
    );
    let _ = writeln!(out, "- Total items: {}", schedule.items.len());
    let _ = writeln!(
        out,
        "- Completion: {:.1}% complete ({} completed, {} pending, {} in progress)",
        schedule.completion_percentage(),
        schedule.completed_items(),
        schedule.pending_items(),
        schedule.in_progress_items()
    );
    let _ = writeln!(out);

    let completed: Vec<_> = schedule
        .items
        .iter()
        .filter(|i| i.status == ScheduleItemStatus::Completed)
        .collect();
    if !completed.is_empty() {
        let _ = writeln!(out, "COMPLETED ITEMS (already finished):");
        for item in completed {
            let actual_end = item
                .actual_end_time
                .map(|t| t.format(TIME_FMT).to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let _ = writeln!(
                out,
                "- Order {} on machine {}: COMPLETED at {} (planned {} - {})",
                item.order_id,
                item.machine_id,
                actual_end,
                item.start_time.format(TIME_FMT),
                item.end_time.format(TIME_FMT)
            );
            if let Some(notes) = &item.notes {
                let _ = writeln!(out, "  Notes: {}", notes);
            }
        }
        let _ = writeln!(out);
    }

    let in_progress: Vec<_> = schedule
        .items
        .iter()
        .filter(|i| i.status == ScheduleItemStatus::InProgress)
        .collect();
    if !in_progress.is_empty() {
        let _ = writeln!(out, "IN-PROGRESS ITEMS (currently running):");
        for item in in_progress {
            let _ = writeln!(
                out,
                "- Order {} on machine {}: planned {} - {} ({} units)",
                item.order_id,
                item.machine_id,
                item.start_time.format(TIME_FMT),
                item.end_time.format(TIME_FMT),
                item.planned_quantity
            );
            if let Some(started) = item.actual_start_time {
                let _ = writeln!(out, "  Actually started: {}", started.format(TIME_FMT));
            }
        }
        let _ = writeln!(out);
    }

    let pending: Vec<_> = schedule
        .items
        .iter()
        .filter(|i| i.status == ScheduleItemStatus::Planned)
        .collect();
    if !pending.is_empty() {
        let _ = writeln!(out, "PENDING ITEMS (not yet started):");
        for item in pending {
            let _ = writeln!(
                out,
                "- Order {} on machine {}: planned {} - {} ({} units)",
                item.order_id,
                item.machine_id,
                item.start_time.format(TIME_FMT),
                item.end_time.format(TIME_FMT),
                item.planned_quantity
            );
        }
        let _ = writeln!(out);
    }

    out
}

/// Prompt for interpreting a natural-language scheduling request.
pub fn build_interpretation_prompt(request: &str, schedule: &Schedule) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are a production scheduling assistant. Analyze the request \
         against the current schedule and answer with: current status, \
         risks, suggestions."
    );
    let _ = writeln!(out, "User request: {}", request);
    let _ = writeln!(out);
    out.push_str(&schedule_digest(schedule));

    let _ = writeln!(out, "RULES:");
    let _ = writeln!(
        out,
        "- COMPLETED items cannot be moved or rescheduled; they are finished."
    );
    let _ = writeln!(
        out,
        "- IN-PROGRESS items should not normally be moved except in critical cases."
    );
    let _ = writeln!(out, "- PENDING items may be rescheduled freely.");
    let _ = writeln!(out, "- Only suggest changes for PENDING items.");

    out
}

/// Prompt for a narrative analysis of the schedule.
pub fn build_analysis_prompt(schedule: &Schedule, now: NaiveDateTime) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Analyze this production schedule and provide insights. Structure \
         the answer as: 1. CURRENT STATUS, 2. ANALYSIS, 3. RECOMMENDATIONS. \
         Keep it concise and actionable."
    );
    let _ = writeln!(
        out,
        "Estimated end date: {}",
        schedule.estimated_end_date(now).format(TIME_FMT)
    );
    let _ = writeln!(out);
    out.push_str(&schedule_digest(schedule));

    out
}

/// Prompt asking for a short explanation of a status change's impact
/// on the schedule end date.
pub fn build_status_change_prompt(
    schedule: &Schedule,
    item_id: i64,
    previous_end: NaiveDateTime,
    new_end: NaiveDateTime,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Explain, in one or two sentences for a production planner, the \
         impact of the status change of item {} on the schedule timeline.",
        item_id
    );
    let _ = writeln!(
        out,
        "End date before the change: {}",
        previous_end.format(TIME_FMT)
    );
    let _ = writeln!(
        out,
        "End date after the change: {}",
        new_end.format(TIME_FMT)
    );
    let _ = writeln!(out);
    out.push_str(&schedule_digest(schedule));

    out
}
