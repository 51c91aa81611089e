//! Process-wide tracing setup shared by binaries and tests.

/// Initialize process-wide observability (structured JSON logs).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Default directive when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Subscriber configuration (filter, format).
pub mod tracing;
