// ==========================================
// Test helpers
// ==========================================
// Shared database bootstrap and entity builders for the
// integration tests.
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use manufacturing_scheduler::ai::TemplatedExplanationService;
use manufacturing_scheduler::config::SchedulingOptions;
use manufacturing_scheduler::db;
use manufacturing_scheduler::domain::machine::{Machine, ProductCapability};
use manufacturing_scheduler::domain::order::ProductionOrder;
use manufacturing_scheduler::domain::types::OrderStatus;
use manufacturing_scheduler::repository::{MachineRepository, OrderRepository, ScheduleRepository};
use manufacturing_scheduler::SchedulingApi;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Create a temporary SQLite database with the full schema.
///
/// The NamedTempFile must be kept alive for the connection to stay
/// valid.
pub fn create_test_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let temp_file = NamedTempFile::new().expect("create temp db file");
    let db_path = temp_file.path().to_str().expect("temp path utf-8").to_string();

    let conn = db::open_sqlite_connection(&db_path).expect("open test db");
    db::init_schema(&conn).expect("init schema");

    (temp_file, Arc::new(Mutex::new(conn)))
}

/// Fixed reference timestamp helpers (March 2026).
pub fn ts(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, min, 0)
        .expect("valid time")
}

pub fn make_order(
    id: i64,
    product: &str,
    quantity: i64,
    priority: i32,
    due_date: NaiveDateTime,
) -> ProductionOrder {
    ProductionOrder {
        id,
        product_name: product.to_string(),
        quantity,
        due_date,
        customer_priority: priority,
        status: OrderStatus::Planned,
        required_materials: vec![],
    }
}

/// Machine builder; capabilities given as (product, setup minutes, rate/hr).
pub fn make_machine(
    id: i64,
    name: &str,
    is_operational: bool,
    capabilities: &[(&str, i64, i64)],
) -> Machine {
    Machine {
        id,
        name: name.to_string(),
        is_operational,
        product_capabilities: capabilities
            .iter()
            .enumerate()
            .map(|(idx, (product, setup, rate))| ProductCapability {
                id: idx as i64 + 1,
                product_name: product.to_string(),
                setup_time_minutes: *setup,
                production_rate_per_hour: *rate,
            })
            .collect(),
        scheduled_maintenance: vec![],
    }
}

/// Repositories plus a fully wired API over one test database.
pub struct TestContext {
    pub db_file: NamedTempFile,
    pub conn: Arc<Mutex<Connection>>,
    pub order_repo: Arc<OrderRepository>,
    pub machine_repo: Arc<MachineRepository>,
    pub schedule_repo: Arc<ScheduleRepository>,
    pub api: SchedulingApi,
}

pub fn setup_api() -> TestContext {
    let (db_file, conn) = create_test_db();

    let order_repo = Arc::new(OrderRepository::new(Arc::clone(&conn)));
    let machine_repo = Arc::new(MachineRepository::new(Arc::clone(&conn)));
    let schedule_repo = Arc::new(ScheduleRepository::new(Arc::clone(&conn)));

    let api = SchedulingApi::new(
        Arc::clone(&order_repo),
        Arc::clone(&machine_repo),
        Arc::clone(&schedule_repo),
        SchedulingOptions::default(),
        Arc::new(TemplatedExplanationService::new()),
    );

    TestContext {
        db_file,
        conn,
        order_repo,
        machine_repo,
        schedule_repo,
        api,
    }
}
