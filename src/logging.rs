// ==========================================
// Logging initialization
// ==========================================
// tracing + tracing-subscriber, level controlled
// through the RUST_LOG environment variable
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Environment
/// - RUST_LOG: filter directive (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=manufacturing_scheduler=trace
///
/// # Example
/// ```no_run
/// use manufacturing_scheduler::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Initialize logging for tests.
///
/// Uses a verbose level and the test writer; safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
