// ==========================================
// Manufacturing Scheduler - Scheduling API
// ==========================================
// Facade wiring repositories, engines and the explanation service.
// Per-schedule operations run end-to-end against one in-memory
// schedule; the only suspension point is the explanation call, which
// runs under a deadline and falls back to templated text. A failing
// explanation never fails the mutation.
// ==========================================

use crate::ai::{prompt, template, ExplanationService};
use crate::api::error::{ApiError, ApiResult};
use crate::config::SchedulingOptions;
use crate::domain::interpretation::SchedulingInterpretation;
use crate::domain::schedule::{Schedule, ScheduleSummary};
use crate::domain::types::ScheduleItemStatus;
use crate::engine::{
    AllocationResult, RecalcEngine, Rescheduler, ScheduleAllocator, StatusChange,
    StatusTransitionHandler,
};
use crate::repository::{MachineRepository, OrderRepository, ScheduleRepository};
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Default deadline for explanation service calls.
pub const DEFAULT_EXPLANATION_TIMEOUT_MS: u64 = 5_000;

// ==========================================
// SchedulingApi
// ==========================================

/// Scheduling facade.
///
/// Responsibilities:
/// 1. Schedule creation from active orders and operational machines
/// 2. Status transitions and the completion shortcut
/// 3. Restart and natural-language driven updates
/// 4. Summaries, insights, deletion and recent-schedule queries
pub struct SchedulingApi {
    order_repo: Arc<OrderRepository>,
    machine_repo: Arc<MachineRepository>,
    schedule_repo: Arc<ScheduleRepository>,
    allocator: ScheduleAllocator,
    status_handler: StatusTransitionHandler,
    rescheduler: Rescheduler,
    explainer: Arc<dyn ExplanationService>,
    options: SchedulingOptions,
    explanation_timeout: Duration,
}

impl SchedulingApi {
    pub fn new(
        order_repo: Arc<OrderRepository>,
        machine_repo: Arc<MachineRepository>,
        schedule_repo: Arc<ScheduleRepository>,
        options: SchedulingOptions,
        explainer: Arc<dyn ExplanationService>,
    ) -> Self {
        Self {
            order_repo,
            machine_repo,
            schedule_repo,
            allocator: ScheduleAllocator::new(options.clone()),
            status_handler: StatusTransitionHandler::new(RecalcEngine::new(&options)),
            rescheduler: Rescheduler::new(&options),
            explainer,
            options,
            explanation_timeout: Duration::from_millis(DEFAULT_EXPLANATION_TIMEOUT_MS),
        }
    }

    pub fn set_explanation_timeout(&mut self, timeout: Duration) {
        self.explanation_timeout = timeout;
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn load_schedule(&self, schedule_id: i64) -> ApiResult<Schedule> {
        self.schedule_repo
            .find_by_id(schedule_id)?
            .ok_or(ApiError::ScheduleNotFound { schedule_id })
    }

    // ==========================================
    // Creation
    // ==========================================

    /// Allocate a fresh schedule from the active orders and
    /// operational machines, stamp the creator, and save it.
    ///
    /// `requested_start` is recorded informationally; the timeline
    /// starts at now + start delay unless `honor_requested_start` is
    /// configured. Skipped orders are reported in the result.
    #[instrument(skip(self), fields(scheduler_name))]
    pub fn create_schedule(
        &self,
        requested_start: Option<NaiveDateTime>,
        scheduler_name: &str,
    ) -> ApiResult<AllocationResult> {
        if scheduler_name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "scheduler name must not be blank".to_string(),
            ));
        }

        let now = Self::now();
        let orders = self.order_repo.get_active_orders()?;
        let machines = self.machine_repo.get_operational_machines()?;
        let schedule_id = self.schedule_repo.next_schedule_id()?;

        let requested = requested_start.unwrap_or(now + self.options.start_delay());
        let mut result = self
            .allocator
            .allocate(schedule_id, &orders, &machines, requested, now);

        result.schedule.created_by = scheduler_name.to_string();
        self.schedule_repo.save(&result.schedule)?;

        tracing::info!(
            schedule_id,
            items = result.schedule.items.len(),
            skipped = result.skipped_order_ids.len(),
            "schedule created"
        );

        Ok(result)
    }

    // ==========================================
    // Status transitions
    // ==========================================

    /// Mark one item completed (the most frequent transition) and
    /// recalculate the remaining timeline.
    pub async fn complete_item(
        &self,
        schedule_id: i64,
        item_id: i64,
        actual_quantity: Option<i64>,
        completion_time: Option<NaiveDateTime>,
        notes: Option<String>,
    ) -> ApiResult<Schedule> {
        let now = Self::now();
        let mut schedule = self.load_schedule(schedule_id)?;

        let outcome = self.status_handler.complete_item(
            &mut schedule,
            item_id,
            actual_quantity,
            completion_time,
            notes,
            now,
        )?;

        let explanation = self
            .explain_status_change(
                &schedule,
                item_id,
                outcome.previous_end_date,
                outcome.new_end_date,
            )
            .await;
        schedule.explanation = Some(explanation);

        self.schedule_repo.save(&schedule)?;
        Ok(schedule)
    }

    /// Apply an arbitrary status change to one item. Timeline-relevant
    /// changes recalculate the schedule and refresh the explanation.
    pub async fn update_item_status(
        &self,
        schedule_id: i64,
        item_id: i64,
        change: StatusChange,
    ) -> ApiResult<Schedule> {
        let now = Self::now();
        let mut schedule = self.load_schedule(schedule_id)?;

        let outcome = self
            .status_handler
            .apply_status(&mut schedule, item_id, change, now)?;

        if outcome.recalculated {
            let explanation = self
                .explain_status_change(
                    &schedule,
                    item_id,
                    outcome.previous_end_date,
                    outcome.new_end_date,
                )
                .await;
            schedule.explanation = Some(explanation);
        }

        self.schedule_repo.save(&schedule)?;
        Ok(schedule)
    }

    // ==========================================
    // Queries
    // ==========================================

    pub fn get_schedule_by_id(&self, schedule_id: i64) -> ApiResult<Schedule> {
        self.load_schedule(schedule_id)
    }

    /// Most recently created schedule, or a fresh empty one.
    pub fn get_current_schedule(&self) -> ApiResult<Schedule> {
        Ok(self.schedule_repo.get_current(Self::now())?)
    }

    pub fn get_schedule_summary(&self, schedule_id: i64) -> ApiResult<ScheduleSummary> {
        let now = Self::now();
        let schedule = self.load_schedule(schedule_id)?;

        let original_end_date = schedule
            .items
            .iter()
            .map(|i| i.end_time)
            .max()
            .unwrap_or(now);
        let current_end_date = schedule.estimated_end_date(now);

        Ok(ScheduleSummary {
            schedule_id,
            original_end_date,
            current_end_date,
            time_saved_minutes: (original_end_date - current_end_date).num_minutes(),
            completion_percentage: schedule.completion_percentage(),
            completed_items: schedule.completed_items(),
            total_items: schedule.items.len(),
            completed_order_names: schedule
                .items
                .iter()
                .filter(|i| i.status == ScheduleItemStatus::Completed)
                .map(|i| i.order_label())
                .collect(),
            remaining_order_names: schedule
                .items
                .iter()
                .filter(|i| {
                    matches!(
                        i.status,
                        ScheduleItemStatus::Planned | ScheduleItemStatus::InProgress
                    )
                })
                .map(|i| i.order_label())
                .collect(),
        })
    }

    /// Narrative analysis of the current schedule state, falling back
    /// to a templated summary when the service is unavailable.
    pub async fn get_schedule_insights(&self, schedule_id: i64) -> ApiResult<String> {
        let now = Self::now();
        let schedule = self.load_schedule(schedule_id)?;

        let prompt_text = prompt::build_analysis_prompt(&schedule, now);
        let call = self.explainer.analyze_schedule(&prompt_text, &schedule);
        match tokio::time::timeout(self.explanation_timeout, call).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "schedule analysis failed, using template");
                Ok(template::analysis_unavailable(&schedule))
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.explanation_timeout.as_millis() as u64,
                    "schedule analysis timed out, using template"
                );
                Ok(template::analysis_unavailable(&schedule))
            }
        }
    }

    // ==========================================
    // Natural-language driven updates
    // ==========================================

    /// Interpret a natural-language request against the current
    /// schedule and apply the suggested changes. An unavailable or
    /// non-actionable interpretation applies no changes but still
    /// records its explanation.
    pub async fn process_natural_language_request(&self, request: &str) -> ApiResult<Schedule> {
        let now = Self::now();
        let mut schedule = self.schedule_repo.get_current(now)?;

        let prompt_text = prompt::build_interpretation_prompt(request, &schedule);
        let call = self.explainer.interpret_request(&prompt_text, &schedule);
        let interpretation = match tokio::time::timeout(self.explanation_timeout, call).await {
            Ok(Ok(interpretation)) => interpretation,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "interpretation failed, applying no changes");
                SchedulingInterpretation::invalid(template::interpretation_unavailable())
            }
            Err(_) => {
                tracing::warn!("interpretation timed out, applying no changes");
                SchedulingInterpretation::invalid(template::interpretation_unavailable())
            }
        };

        self.apply_scheduling_changes(&mut schedule, &interpretation, now);
        self.schedule_repo.save(&schedule)?;
        Ok(schedule)
    }

    /// Apply structured change suggestions to the schedule, matching
    /// items by order id. Status suggestions auto-stamp actual
    /// timestamps the same way direct transitions do.
    fn apply_scheduling_changes(
        &self,
        schedule: &mut Schedule,
        interpretation: &SchedulingInterpretation,
        now: NaiveDateTime,
    ) {
        schedule.created_at = now;
        schedule.created_by.push_str(" (Updated)");
        schedule.explanation = Some(interpretation.explanation_text.clone());

        for change in &interpretation.suggested_changes {
            let item = match schedule.item_by_order_id_mut(change.order_id) {
                Some(item) => item,
                None => {
                    tracing::warn!(order_id = change.order_id, "suggested change targets unknown order");
                    continue;
                }
            };

            if let Some(start) = change.new_start_time {
                item.start_time = start;
            }
            if let Some(end) = change.new_end_time {
                item.end_time = end;
            }
            if let Some(machine_id) = change.new_machine_id {
                item.machine_id = machine_id;
                item.machine_name = None; // snapshot no longer matches
            }
            if let Some(status) = change.new_status {
                item.status = status;

                if status == ScheduleItemStatus::InProgress && item.actual_start_time.is_none() {
                    item.actual_start_time = Some(now);
                }
                if status == ScheduleItemStatus::Completed && item.actual_end_time.is_none() {
                    item.actual_end_time = Some(now);
                }
            }

            tracing::debug!(order_id = change.order_id, reason = %change.reason, "suggested change applied");
        }
    }

    // ==========================================
    // Restart
    // ==========================================

    /// Shift the whole timeline so it starts at now + restart lead.
    pub fn restart_schedule_now(&self, schedule_id: i64) -> ApiResult<Schedule> {
        let now = Self::now();
        let mut schedule = self.load_schedule(schedule_id)?;

        self.rescheduler.restart_now(&mut schedule, now)?;

        self.schedule_repo.save(&schedule)?;
        Ok(schedule)
    }

    // ==========================================
    // Deletion & history
    // ==========================================

    pub fn delete_schedule(&self, schedule_id: i64) -> ApiResult<()> {
        self.schedule_repo.delete(schedule_id)?;
        Ok(())
    }

    pub fn batch_delete_schedules(&self, schedule_ids: &[i64]) -> ApiResult<usize> {
        Ok(self.schedule_repo.batch_delete(schedule_ids)?)
    }

    pub fn list_recent_schedules(
        &self,
        count: usize,
        created_by_filter: Option<&str>,
        created_before: Option<NaiveDateTime>,
    ) -> ApiResult<Vec<Schedule>> {
        Ok(self
            .schedule_repo
            .list_recent(count, created_by_filter, created_before)?)
    }

    // ==========================================
    // Explanation plumbing
    // ==========================================

    /// Ask the service for a short end-date impact explanation; on
    /// error or deadline expiry use the deterministic template.
    async fn explain_status_change(
        &self,
        schedule: &Schedule,
        item_id: i64,
        previous_end: NaiveDateTime,
        new_end: NaiveDateTime,
    ) -> String {
        let prompt_text =
            prompt::build_status_change_prompt(schedule, item_id, previous_end, new_end);

        let call = self.explainer.generate_explanation(&prompt_text);
        match tokio::time::timeout(self.explanation_timeout, call).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "explanation failed, using template");
                template::status_change_explanation(item_id, previous_end, new_end)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.explanation_timeout.as_millis() as u64,
                    "explanation timed out, using template"
                );
                template::status_change_explanation(item_id, previous_end, new_end)
            }
        }
    }
}
