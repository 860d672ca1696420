/*!
 * Engine Synchronization Core
 *
 * Low-level synchronization layer for the storage engine:
 * - `atomic`: generic atomic cells bound to a fixed memory-ordering policy
 * - `sync`: instrumented mutex / condition variable
 * - `stats`, `time`: contracts for the external statistics and clock
 *   collaborators
 * - `thread_state`: debug-only liveness reporting hook
 * - `test_hooks`: named test-injection points (test builds only)
 */

pub mod atomic;
pub mod stats;
pub mod sync;
#[cfg(any(test, feature = "test-hooks"))]
pub mod test_hooks;
pub mod thread_state;
pub mod time;

// Re-exports
pub use atomic::{AcqRelCell, RelaxedCell};
pub use stats::{Histogram, StatsLevel, StatsSink};
pub use sync::{InstrumentedCondvar, InstrumentedMutex, InstrumentedMutexGuard, WaitTag};
pub use time::{Clock, SystemClock};

/// Named test-injection point.
///
/// Fires the callback registered under `$name` (if any) with a `&mut dyn
/// Any` payload, letting a test harness observe or rewrite the payload
/// before the guarded operation proceeds. Expands to nothing unless
/// compiled for tests or with the `test-hooks` feature.
#[macro_export]
macro_rules! sync_point {
    ($name:expr, $payload:expr) => {{
        #[cfg(any(test, feature = "test-hooks"))]
        {
            $crate::test_hooks::fire($name, $payload);
        }
        #[cfg(not(any(test, feature = "test-hooks")))]
        {
            let _ = $payload;
        }
    }};
}
