//! Logging bootstrap for test binaries.
//!
//! Each integration binary installs this once from a `ctor` hook. Unit
//! tests inside the backend crate have their own equivalent; both read
//! the same environment variables so one knob controls all test output.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Level selection, most specific wins: `TEST_LOG`, then `RUST_LOG`,
/// then a quiet `warn` default.
fn filter_from_env() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install the test subscriber. Idempotent; safe to call from every
/// binary and from individual tests.
///
/// `with_test_writer` keeps output attached to the owning test so cargo
/// and nextest can capture it, and timestamps are dropped so failures
/// diff cleanly between runs.
pub fn init() {
    INSTALLED.get_or_init(|| {
        fmt()
            .with_env_filter(filter_from_env())
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
