/*!
 * Instrumented Lock Primitives
 *
 * Mutex and condition variable wrappers around `parking_lot`, with optional
 * lock-wait latency measurement into an external statistics sink and
 * optional chaos-mode scheduling perturbation for concurrency-bug
 * discovery. Every engine subsystem that blocks goes through these.
 */

#[cfg(feature = "chaos")]
mod chaos;
mod condvar;
mod instrument;
mod mutex;

pub use condvar::InstrumentedCondvar;
pub use instrument::{Instrumentation, WaitTag};
pub use mutex::{InstrumentedMutex, InstrumentedMutexGuard};
