//! Subscriber initialization.
//!
//! One JSON line per event, filtered via `RUST_LOG`. Spans and fields emitted by the
//! allocation service (`sku`, `order_id`, `batch_ref`, ...) show up as JSON keys.

use tracing_subscriber::EnvFilter;

use crate::DEFAULT_FILTER;

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init();
        assert!(!init());
        ::tracing::info!(sku = "LAMP", "still logging");
    }
}
