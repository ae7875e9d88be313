// ==========================================
// Recalculation engine tests
// ==========================================

mod test_helpers;

use chrono::{Duration, NaiveDateTime};
use manufacturing_scheduler::config::SchedulingOptions;
use manufacturing_scheduler::domain::schedule::{Schedule, ScheduleItem};
use manufacturing_scheduler::domain::types::ScheduleItemStatus;
use manufacturing_scheduler::RecalcEngine;
use test_helpers::ts;

fn make_item(
    id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: ScheduleItemStatus,
) -> ScheduleItem {
    ScheduleItem {
        id,
        order_id: id,
        machine_id: 1,
        start_time: start,
        end_time: end,
        planned_quantity: 100,
        product_name: Some(format!("Product {}", id)),
        machine_name: Some("Press A".to_string()),
        status,
        actual_start_time: None,
        actual_end_time: None,
        actual_quantity: None,
        notes: None,
    }
}

fn make_schedule(items: Vec<ScheduleItem>) -> Schedule {
    Schedule {
        id: 1,
        created_at: ts(1, 7, 0),
        created_by: "Test".to_string(),
        items,
        explanation: None,
    }
}

fn engine() -> RecalcEngine {
    RecalcEngine::new(&SchedulingOptions::default())
}

#[test]
fn test_early_completion_pulls_planned_item_forward() {
    // item 1 planned 08:00-10:00, finished at 09:00; item 2 planned
    // 10:10-12:10 should move up to the completion time
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(1, 9, 0));

    let mut schedule = make_schedule(vec![
        completed,
        make_item(2, ts(1, 10, 10), ts(1, 12, 10), ScheduleItemStatus::Planned),
    ]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.moved_items, 1);
    let moved = schedule.item_by_id(2).unwrap();
    assert_eq!(moved.start_time, ts(1, 9, 0));
    assert_eq!(moved.end_time, ts(1, 11, 0));
    assert_eq!(outcome.new_end_date, ts(1, 11, 0));
    assert_eq!(outcome.minutes_saved(), 70);
}

#[test]
fn test_recalculate_is_idempotent() {
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(1, 8, 30));

    let mut schedule = make_schedule(vec![
        completed,
        make_item(2, ts(1, 10, 10), ts(1, 11, 10), ScheduleItemStatus::Planned),
        make_item(3, ts(1, 11, 20), ts(1, 13, 20), ScheduleItemStatus::Planned),
    ]);

    let first = engine().recalculate(&mut schedule, now);
    let after_first: Vec<(NaiveDateTime, NaiveDateTime)> = schedule
        .items
        .iter()
        .map(|i| (i.start_time, i.end_time))
        .collect();

    let second = engine().recalculate(&mut schedule, now);
    let after_second: Vec<(NaiveDateTime, NaiveDateTime)> = schedule
        .items
        .iter()
        .map(|i| (i.start_time, i.end_time))
        .collect();

    assert!(first.moved_items > 0);
    assert_eq!(second.moved_items, 0);
    assert_eq!(after_first, after_second);
    assert_eq!(first.new_end_date, second.new_end_date);
}

#[test]
fn test_planned_items_keep_duration_and_spacing() {
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(1, 8, 30));

    let mut schedule = make_schedule(vec![
        completed,
        make_item(2, ts(1, 10, 10), ts(1, 11, 10), ScheduleItemStatus::Planned),
        make_item(3, ts(1, 11, 40), ts(1, 13, 40), ScheduleItemStatus::Planned),
    ]);

    engine().recalculate(&mut schedule, now);

    let a = schedule.item_by_id(2).unwrap();
    let b = schedule.item_by_id(3).unwrap();
    assert_eq!(a.planned_duration(), Duration::minutes(60));
    assert_eq!(b.planned_duration(), Duration::minutes(120));
    // compaction buffer between consecutive pending items
    assert_eq!(b.start_time, a.end_time + Duration::minutes(30));
}

#[test]
fn test_items_never_pushed_later() {
    // pending item already earlier than the cursor stays where it is
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(1, 10, 0));

    let mut schedule = make_schedule(vec![
        completed,
        make_item(2, ts(1, 9, 30), ts(1, 10, 30), ScheduleItemStatus::Planned),
    ]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.moved_items, 0);
    let item = schedule.item_by_id(2).unwrap();
    assert_eq!(item.start_time, ts(1, 9, 30));
    assert_eq!(item.end_time, ts(1, 10, 30));
}

#[test]
fn test_completed_and_in_progress_items_never_move() {
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(1, 9, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(1, 8, 15));

    let mut schedule = make_schedule(vec![
        completed,
        make_item(2, ts(1, 9, 30), ts(1, 10, 30), ScheduleItemStatus::InProgress),
        make_item(3, ts(1, 11, 0), ts(1, 12, 0), ScheduleItemStatus::Cancelled),
    ]);

    engine().recalculate(&mut schedule, now);

    assert_eq!(schedule.item_by_id(1).unwrap().start_time, ts(1, 8, 0));
    assert_eq!(schedule.item_by_id(2).unwrap().start_time, ts(1, 9, 30));
    assert_eq!(schedule.item_by_id(3).unwrap().start_time, ts(1, 11, 0));
}

#[test]
fn test_end_date_with_only_cancelled_items_is_now() {
    let now = ts(1, 9, 0);
    let mut schedule = make_schedule(vec![
        make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Cancelled),
        make_item(2, ts(1, 10, 10), ts(1, 12, 10), ScheduleItemStatus::Cancelled),
    ]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.new_end_date, now);
}

#[test]
fn test_end_date_all_completed_uses_latest_actual_end() {
    let now = ts(2, 9, 0);
    let mut a = make_item(1, ts(1, 8, 0), ts(1, 10, 0), ScheduleItemStatus::Completed);
    a.actual_end_time = Some(ts(1, 9, 45));
    // no actual end recorded, planned end counts instead
    let b = make_item(2, ts(1, 10, 10), ts(1, 12, 10), ScheduleItemStatus::Completed);

    let mut schedule = make_schedule(vec![a, b]);
    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.new_end_date, ts(1, 12, 10));
}

#[test]
fn test_end_date_prefers_active_items() {
    let now = ts(1, 9, 0);
    let mut completed = make_item(1, ts(1, 8, 0), ts(2, 10, 0), ScheduleItemStatus::Completed);
    completed.actual_end_time = Some(ts(2, 10, 0));

    let mut schedule = make_schedule(vec![
        completed,
        // active item ends before the completed one; it still drives
        // the end date because active work defines the frontier
        make_item(2, ts(1, 9, 30), ts(1, 10, 30), ScheduleItemStatus::InProgress),
    ]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.new_end_date, ts(1, 10, 30));
}

#[test]
fn test_empty_schedule_end_date_is_now() {
    let now = ts(1, 9, 0);
    let mut schedule = make_schedule(vec![]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.previous_end_date, now);
    assert_eq!(outcome.new_end_date, now);
    assert_eq!(outcome.moved_items, 0);
}

#[test]
fn test_no_completed_items_compacts_toward_now() {
    let now = ts(1, 8, 0);
    let mut schedule = make_schedule(vec![make_item(
        1,
        ts(1, 12, 0),
        ts(1, 14, 0),
        ScheduleItemStatus::Planned,
    )]);

    let outcome = engine().recalculate(&mut schedule, now);

    assert_eq!(outcome.moved_items, 1);
    let item = schedule.item_by_id(1).unwrap();
    assert_eq!(item.start_time, now);
    assert_eq!(item.end_time, ts(1, 10, 0));
}
