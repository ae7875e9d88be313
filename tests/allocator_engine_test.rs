// ==========================================
// Allocation engine tests
// ==========================================

mod test_helpers;

use chrono::Duration;
use manufacturing_scheduler::config::SchedulingOptions;
use manufacturing_scheduler::domain::types::ScheduleItemStatus;
use manufacturing_scheduler::ScheduleAllocator;
use test_helpers::{make_machine, make_order, ts};

#[test]
fn test_single_order_duration() {
    // 100 units at 50/hr is 120 min of production plus 10 min setup
    let now = ts(1, 8, 0);
    let orders = vec![make_order(1, "Widget", 100, 5, ts(5, 0, 0))];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 10, 50)])];

    let allocator = ScheduleAllocator::with_defaults();
    let result = allocator.allocate(1, &orders, &machines, now, now);

    assert_eq!(result.schedule.items.len(), 1);
    assert!(result.skipped_order_ids.is_empty());

    let item = &result.schedule.items[0];
    assert_eq!(item.start_time, now + Duration::minutes(10));
    assert_eq!(item.end_time, item.start_time + Duration::minutes(130));
    assert_eq!(item.status, ScheduleItemStatus::Planned);
    assert_eq!(item.planned_quantity, 100);
    assert_eq!(item.product_name.as_deref(), Some("Widget"));
    assert_eq!(item.machine_name.as_deref(), Some("Press A"));
}

#[test]
fn test_orders_sorted_by_priority_then_due_date() {
    let now = ts(1, 8, 0);
    let orders = vec![
        make_order(1, "Widget", 10, 1, ts(2, 0, 0)),
        make_order(2, "Widget", 10, 9, ts(6, 0, 0)),
        make_order(3, "Widget", 10, 9, ts(3, 0, 0)),
    ];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(7, &orders, &machines, now, now);

    let order_ids: Vec<i64> = result.schedule.items.iter().map(|i| i.order_id).collect();
    // highest priority first; equal priority breaks on earlier due date
    assert_eq!(order_ids, vec![3, 2, 1]);
}

#[test]
fn test_buffer_between_consecutive_items() {
    let now = ts(1, 8, 0);
    let orders = vec![
        make_order(1, "Widget", 60, 5, ts(2, 0, 0)),
        make_order(2, "Widget", 60, 4, ts(2, 0, 0)),
    ];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 0, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert_eq!(result.schedule.items.len(), 2);
    let first = &result.schedule.items[0];
    let second = &result.schedule.items[1];
    assert_eq!(second.start_time, first.end_time + Duration::minutes(10));
}

#[test]
fn test_skips_order_without_capable_machine() {
    let now = ts(1, 8, 0);
    let orders = vec![
        make_order(1, "Widget", 10, 5, ts(2, 0, 0)),
        make_order(2, "Gadget", 10, 4, ts(2, 0, 0)),
    ];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert_eq!(result.schedule.items.len(), 1);
    assert_eq!(result.schedule.items[0].order_id, 1);
    assert_eq!(result.skipped_order_ids, vec![2]);
}

#[test]
fn test_skips_order_when_only_machine_is_down() {
    let now = ts(1, 8, 0);
    let orders = vec![make_order(1, "Widget", 10, 5, ts(2, 0, 0))];
    let machines = vec![make_machine(1, "Press A", false, &[("Widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert!(result.schedule.items.is_empty());
    assert_eq!(result.skipped_order_ids, vec![1]);
    assert!(result.schedule.explanation.is_none());
}

#[test]
fn test_product_match_is_case_insensitive() {
    let now = ts(1, 8, 0);
    let orders = vec![make_order(1, "WIDGET", 10, 5, ts(2, 0, 0))];
    let machines = vec![make_machine(1, "Press A", true, &[("widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert_eq!(result.schedule.items.len(), 1);
}

#[test]
fn test_first_fit_prefers_earlier_machine() {
    let now = ts(1, 8, 0);
    let orders = vec![make_order(1, "Widget", 10, 5, ts(2, 0, 0))];
    let machines = vec![
        make_machine(1, "Press A", true, &[("Widget", 5, 60)]),
        make_machine(2, "Press B", true, &[("Widget", 1, 600)]),
    ];

    // Press B would be faster; first fit does not care
    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert_eq!(result.schedule.items[0].machine_id, 1);
}

#[test]
fn test_item_count_never_exceeds_order_count() {
    let now = ts(1, 8, 0);
    let orders = vec![
        make_order(1, "Widget", 10, 5, ts(2, 0, 0)),
        make_order(2, "Gadget", 10, 4, ts(2, 0, 0)),
        make_order(3, "Sprocket", 10, 3, ts(2, 0, 0)),
    ];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60), ("Gadget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    assert!(result.schedule.items.len() <= orders.len());
    assert_eq!(
        result.schedule.items.len() + result.skipped_order_ids.len(),
        orders.len()
    );
}

#[test]
fn test_requested_start_ignored_by_default() {
    let now = ts(1, 8, 0);
    let requested = ts(3, 12, 0);
    let orders = vec![make_order(1, "Widget", 10, 5, ts(5, 0, 0))];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, requested, now);

    assert_eq!(result.schedule.items[0].start_time, now + Duration::minutes(10));
}

#[test]
fn test_requested_start_honored_when_configured() {
    let now = ts(1, 8, 0);
    let requested = ts(3, 12, 0);
    let orders = vec![make_order(1, "Widget", 10, 5, ts(5, 0, 0))];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60)])];

    let options = SchedulingOptions {
        honor_requested_start: true,
        ..Default::default()
    };
    let result = ScheduleAllocator::new(options).allocate(1, &orders, &machines, requested, now);

    assert_eq!(result.schedule.items[0].start_time, requested);
}

#[test]
fn test_explanation_mentions_start_and_end() {
    let now = ts(1, 8, 0);
    let orders = vec![make_order(1, "Widget", 60, 5, ts(5, 0, 0))];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 0, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    let explanation = result.schedule.explanation.expect("explanation set");
    assert!(explanation.contains("03/01 08:10"));
    assert!(explanation.contains("03/01 09:10"));
    assert!(explanation.contains("Ready for production"));
}

#[test]
fn test_item_ids_are_sequential_from_one() {
    let now = ts(1, 8, 0);
    let orders = vec![
        make_order(1, "Widget", 10, 5, ts(2, 0, 0)),
        make_order(2, "Widget", 10, 4, ts(2, 0, 0)),
    ];
    let machines = vec![make_machine(1, "Press A", true, &[("Widget", 5, 60)])];

    let result = ScheduleAllocator::with_defaults().allocate(1, &orders, &machines, now, now);

    let ids: Vec<i64> = result.schedule.items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2]);
}
