/*!
 * Thread State Reporting Hook
 *
 * Debug-only bridge to the engine's thread-liveness subsystem. The lock
 * layer announces "about to block on a mutex" before blocking; the report
 * is advisory and never affects correctness, so release builds compile the
 * call away entirely.
 */

use std::sync::OnceLock;

/// States this layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// The thread is about to block waiting for a mutex or condvar.
    MutexWait,
}

/// Receiver for advisory thread-state reports.
pub trait StateReporter: Send + Sync {
    fn report_state_delay(&self, state: ThreadState);
}

static REPORTER: OnceLock<Box<dyn StateReporter>> = OnceLock::new();

/// Install the process-wide reporter. Returns `false` if one was already
/// installed (the first installation wins).
pub fn set_reporter(reporter: Box<dyn StateReporter>) -> bool {
    let installed = REPORTER.set(reporter).is_ok();
    if !installed {
        log::warn!("thread-state reporter already installed, ignoring replacement");
    }
    installed
}

/// Forward a state report to the installed reporter, if any.
///
/// Compiled only in debug builds; callers gate the call site the same way.
#[cfg(debug_assertions)]
pub(crate) fn report_state_delay(state: ThreadState) {
    if let Some(reporter) = REPORTER.get() {
        reporter.report_state_delay(state);
    }
}
