//! Shared helpers for the taskpool integration tests.

pub mod builders;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tokio::time::Instant;
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single run under test. A run that hangs past this is
/// a bug in the pool, not a slow machine.
pub const RUN_LIMIT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured per test and only shown for failures. Set e.g.
/// `RUST_LOG=taskpool=trace` to see task state transitions.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("taskpool=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it takes longer than [`RUN_LIMIT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(RUN_LIMIT, f)
        .await
        .unwrap_or_else(|_| panic!("run did not finish within {RUN_LIMIT:?}"))
}

/// Await `f` under [`with_timeout`] and report how long it took.
pub async fn timed<F, T>(f: F) -> (T, Duration)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = with_timeout(f).await;
    (out, start.elapsed())
}
