/*!
 * Clock Contract
 *
 * The engine's wall-clock/monotonic abstraction is an external
 * collaborator; this layer consumes it only through "now" and "sleep".
 * Deadlines passed to `timed_wait` are absolute microseconds in the same
 * epoch as `now_micros`.
 */

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time source consumed by the instrumented lock layer.
pub trait Clock: Send + Sync {
    /// Current time in microseconds since the clock's epoch.
    fn now_micros(&self) -> u64;

    /// Current time in nanoseconds since the clock's epoch.
    fn now_nanos(&self) -> u64 {
        self.now_micros() * 1_000
    }

    /// Block the calling thread for the given number of microseconds.
    fn sleep_micros(&self, micros: u64);
}

/// Wall clock backed by `std::time::SystemTime`, epoch = Unix epoch.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }

    /// Process-wide shared instance.
    pub fn default_instance() -> &'static Arc<SystemClock> {
        static INSTANCE: OnceLock<Arc<SystemClock>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(SystemClock))
    }

    fn since_epoch() -> Duration {
        // A clock before the Unix epoch is a misconfigured host; saturate
        // rather than panic on the lock path.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

impl Clock for SystemClock {
    fn now_micros(&self) -> u64 {
        Self::since_epoch().as_micros() as u64
    }

    fn now_nanos(&self) -> u64 {
        Self::since_epoch().as_nanos() as u64
    }

    fn sleep_micros(&self, micros: u64) {
        thread::sleep(Duration::from_micros(micros));
    }
}
