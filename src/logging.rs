//! Logging initialization built on `tracing`.
//!
//! The analysis pipeline emits `tracing` events (table loads, model fits,
//! anomaly counts). Call [`init`] once at process start; the subscriber is
//! process-global.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The log level is read from `RUST_LOG` (default: `info`), e.g.
/// `RUST_LOG=laundry_analytics=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Initialize logging for tests.
///
/// Uses the test writer so output is captured per test, and tolerates
/// repeated calls from multiple test functions.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
