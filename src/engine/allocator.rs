// ==========================================
// Manufacturing Scheduler - Allocation engine
// ==========================================
// Single-pass greedy, first-fit allocation of orders to machines.
// Deliberately non-optimal: no load balancing across capable
// machines, no maintenance windows, no backtracking. Orders with
// no capable operational machine are skipped (reported, not errors).
// ==========================================

use crate::config::SchedulingOptions;
use crate::domain::machine::Machine;
use crate::domain::order::ProductionOrder;
use crate::domain::schedule::{Schedule, ScheduleItem};
use crate::domain::types::ScheduleItemStatus;
use chrono::NaiveDateTime;
use tracing::instrument;

// ==========================================
// AllocationResult
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub schedule: Schedule,
    /// Orders omitted because no operational machine carried a
    /// matching capability, in processing order.
    pub skipped_order_ids: Vec<i64>,
}

// ==========================================
// ScheduleAllocator
// ==========================================
pub struct ScheduleAllocator {
    options: SchedulingOptions,
}

impl ScheduleAllocator {
    pub fn new(options: SchedulingOptions) -> Self {
        Self { options }
    }

    pub fn with_defaults() -> Self {
        Self::new(SchedulingOptions::default())
    }

    /// Allocate active orders onto operational machines from a single
    /// time cursor.
    ///
    /// The timeline starts at now + start delay; `requested_start` is
    /// recorded informationally and only used when
    /// `honor_requested_start` is configured. Orders are processed by
    /// priority (descending), then due date (ascending); each one goes
    /// to the first machine in input order that can produce it.
    #[instrument(skip(self, orders, machines), fields(orders = orders.len(), machines = machines.len()))]
    pub fn allocate(
        &self,
        schedule_id: i64,
        orders: &[ProductionOrder],
        machines: &[Machine],
        requested_start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> AllocationResult {
        let effective_start = if self.options.honor_requested_start {
            requested_start
        } else {
            now + self.options.start_delay()
        };

        tracing::debug!(
            %requested_start,
            %effective_start,
            honor_requested_start = self.options.honor_requested_start,
            "allocation start time resolved"
        );

        let mut sorted: Vec<&ProductionOrder> = orders.iter().collect();
        sorted.sort_by(|a, b| {
            b.customer_priority
                .cmp(&a.customer_priority)
                .then(a.due_date.cmp(&b.due_date))
        });

        let mut schedule = Schedule {
            id: schedule_id,
            created_at: now,
            created_by: "Algorithm".to_string(),
            items: Vec::new(),
            explanation: None,
        };
        let mut skipped_order_ids = Vec::new();
        let mut current_time = effective_start;

        for order in sorted {
            let matched = machines.iter().find_map(|m| {
                if !m.is_operational {
                    return None;
                }
                m.capability_for(&order.product_name).map(|cap| (m, cap))
            });

            let (machine, capability) = match matched {
                Some(pair) => pair,
                None => {
                    tracing::warn!(
                        order_id = order.id,
                        product = %order.product_name,
                        "no capable operational machine, order skipped"
                    );
                    skipped_order_ids.push(order.id);
                    continue;
                }
            };

            let total = capability.total_duration(order.quantity);
            let end_time = current_time + total;

            let item = ScheduleItem {
                id: schedule.next_item_id(),
                order_id: order.id,
                machine_id: machine.id,
                start_time: current_time,
                end_time,
                planned_quantity: order.quantity,
                product_name: Some(order.product_name.clone()),
                machine_name: Some(machine.name.clone()),
                status: ScheduleItemStatus::Planned,
                actual_start_time: None,
                actual_end_time: None,
                actual_quantity: None,
                notes: None,
            };

            tracing::debug!(
                item_id = item.id,
                order_id = order.id,
                machine = %machine.name,
                start = %item.start_time,
                end = %item.end_time,
                "order allocated"
            );

            schedule.items.push(item);
            current_time = end_time + self.options.buffer();
        }

        if !schedule.items.is_empty() {
            let last_end = schedule
                .items
                .iter()
                .map(|i| i.end_time)
                .max()
                .expect("non-empty items");
            schedule.explanation = Some(format!(
                "Schedule starts at {} and finishes at {}. Ready for production.",
                effective_start.format("%m/%d %H:%M"),
                last_end.format("%m/%d %H:%M"),
            ));
        }

        tracing::info!(
            schedule_id,
            allocated = schedule.items.len(),
            skipped = skipped_order_ids.len(),
            "allocation finished"
        );

        AllocationResult {
            schedule,
            skipped_order_ids,
        }
    }
}
