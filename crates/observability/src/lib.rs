//! Process-wide tracing setup shared by binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! binary's job.

/// Tracing subscriber configuration.
pub mod tracing;

pub use tracing::LogFormat;

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json, "info");
}
