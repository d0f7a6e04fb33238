//! Tracing/logging initialization.
//!
//! Services and job workers emit structured events (order lifecycle, stock
//! adjustments, export generation) through `tracing`; this module wires the
//! process-wide subscriber they land in.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Defaults to `info` and is overridable through `RUST_LOG` (for example
/// `RUST_LOG=ordermill_infra=debug`). Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init() {
    init_with_default_filter("info");
}

/// Like [`init`], with an explicit fallback filter for when `RUST_LOG` is
/// unset. Useful for workers that want `debug` by default.
pub fn init_with_default_filter(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
