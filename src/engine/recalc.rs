// ==========================================
// Manufacturing Scheduler - Recalculation engine
// ==========================================
// Re-derives the schedule end date and compacts pending work after
// status changes. Compaction only ever pulls Planned items earlier;
// terminal items are historical and never move.
// ==========================================

use crate::config::SchedulingOptions;
use crate::domain::schedule::Schedule;
use crate::domain::types::ScheduleItemStatus;
use chrono::{Duration, NaiveDateTime};
use tracing::instrument;

// ==========================================
// RecalcOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct RecalcOutcome {
    pub previous_end_date: NaiveDateTime,
    pub new_end_date: NaiveDateTime,
    /// Planned items pulled earlier by the compaction pass.
    pub moved_items: usize,
}

impl RecalcOutcome {
    /// Positive when the schedule now ends earlier than before.
    pub fn minutes_saved(&self) -> i64 {
        (self.previous_end_date - self.new_end_date).num_minutes()
    }
}

// ==========================================
// RecalcEngine
// ==========================================
pub struct RecalcEngine {
    buffer: Duration,
}

impl RecalcEngine {
    pub fn new(options: &SchedulingOptions) -> Self {
        Self {
            buffer: options.recalc_buffer(),
        }
    }

    /// Recalculate the schedule in place.
    ///
    /// Both responsibilities always run: the end date is re-derived
    /// (see `Schedule::estimated_end_date`) and Planned items are
    /// compacted toward the earliest available time. Idempotent when
    /// no status changed in between.
    #[instrument(skip(self, schedule), fields(schedule_id = schedule.id, items = schedule.items.len()))]
    pub fn recalculate(&self, schedule: &mut Schedule, now: NaiveDateTime) -> RecalcOutcome {
        let previous_end_date = schedule.estimated_end_date(now);

        let moved_items = self.compact_pending(schedule, now);

        let new_end_date = schedule.estimated_end_date(now);
        tracing::debug!(
            %previous_end_date,
            %new_end_date,
            moved_items,
            "recalculation finished"
        );

        RecalcOutcome {
            previous_end_date,
            new_end_date,
            moved_items,
        }
    }

    /// Pull Planned items toward the earliest time new work can begin:
    /// the latest completion (actual end preferred) among Completed
    /// items, or `now` when nothing has completed yet.
    ///
    /// Walking the Planned items in planned-start order, an item is
    /// shifted only when the cursor is strictly earlier than its
    /// current start; its duration is preserved. Items never move
    /// later: the allocator's initial ordering guarantees pending
    /// items need no push-back.
    fn compact_pending(&self, schedule: &mut Schedule, now: NaiveDateTime) -> usize {
        let earliest_available = schedule
            .items
            .iter()
            .filter(|i| i.status == ScheduleItemStatus::Completed)
            .map(|i| i.effective_end_time())
            .max()
            .unwrap_or(now);

        let mut pending: Vec<usize> = schedule
            .items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.status == ScheduleItemStatus::Planned)
            .map(|(idx, _)| idx)
            .collect();
        pending.sort_by_key(|&idx| schedule.items[idx].start_time);

        if pending.is_empty() {
            tracing::debug!("no pending items to compact");
            return 0;
        }

        let mut cursor = earliest_available;
        let mut moved = 0usize;

        for idx in pending {
            let item = &mut schedule.items[idx];
            let original_end = item.end_time;
            let duration = item.planned_duration();

            if cursor < item.start_time {
                item.start_time = cursor;
                item.end_time = cursor + duration;
                moved += 1;

                tracing::debug!(
                    item_id = item.id,
                    new_start = %item.start_time,
                    new_end = %item.end_time,
                    "pending item pulled earlier"
                );

                cursor = item.end_time + self.buffer;
            } else {
                // already as early as it can be
                cursor = original_end + self.buffer;
            }
        }

        moved
    }
}
