// ==========================================
// FleetFlow - Logging setup
// ==========================================
// tracing + tracing-subscriber; RUST_LOG wins over the configured filter
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// # Environment
/// - RUST_LOG: filter directive, e.g. `RUST_LOG=fleet_flow=debug`.
///   When unset, `default_filter` (AppConfig::log_filter) applies.
///
/// # Example
/// ```no_run
/// fleet_flow::logging::init("info");
/// ```
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber writing through the test harness; safe to call repeatedly
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Same as `init`, emitting one JSON object per event
pub fn init_json(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().json().with_env_filter(filter).with_target(true).init();
}
