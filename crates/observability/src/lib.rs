//! Tracing/logging setup shared by every ordermill process.
//!
//! Embedders (binaries, test harnesses) own the [`init`] call; library
//! crates only emit events.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
