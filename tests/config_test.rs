// ==========================================
// Configuration layer tests
// ==========================================

mod test_helpers;

use manufacturing_scheduler::config::{config_keys, ConfigManager, SchedulingOptions};
use std::sync::Arc;
use test_helpers::create_test_db;

#[test]
fn test_defaults_without_stored_values() {
    let (_db_file, conn) = create_test_db();
    let manager = ConfigManager::from_connection(Arc::clone(&conn)).expect("config manager");

    let options = manager.scheduling_options().expect("options");
    let defaults = SchedulingOptions::default();

    assert_eq!(options.start_delay_minutes, defaults.start_delay_minutes);
    assert_eq!(options.buffer_minutes, defaults.buffer_minutes);
    assert_eq!(options.recalc_buffer_minutes, defaults.recalc_buffer_minutes);
    assert_eq!(options.restart_lead_minutes, defaults.restart_lead_minutes);
    assert!(!options.honor_requested_start);
}

#[test]
fn test_stored_values_override_defaults() {
    let (_db_file, conn) = create_test_db();
    let manager = ConfigManager::from_connection(Arc::clone(&conn)).expect("config manager");

    manager
        .set_config_value(config_keys::START_DELAY_MINUTES, "25")
        .unwrap();
    manager
        .set_config_value(config_keys::HONOR_REQUESTED_START, "true")
        .unwrap();

    let options = manager.scheduling_options().expect("options");
    assert_eq!(options.start_delay_minutes, 25);
    assert!(options.honor_requested_start);
    // untouched keys keep their defaults
    assert_eq!(options.recalc_buffer_minutes, 30);
}

#[test]
fn test_set_config_value_upserts() {
    let (_db_file, conn) = create_test_db();
    let manager = ConfigManager::from_connection(Arc::clone(&conn)).expect("config manager");

    manager.set_config_value(config_keys::BUFFER_MINUTES, "5").unwrap();
    manager.set_config_value(config_keys::BUFFER_MINUTES, "15").unwrap();

    let options = manager.scheduling_options().expect("options");
    assert_eq!(options.buffer_minutes, 15);
}

#[test]
fn test_non_numeric_value_is_rejected() {
    let (_db_file, conn) = create_test_db();
    let manager = ConfigManager::from_connection(Arc::clone(&conn)).expect("config manager");

    manager
        .set_config_value(config_keys::RESTART_LEAD_MINUTES, "soon")
        .unwrap();

    assert!(manager.scheduling_options().is_err());
}
