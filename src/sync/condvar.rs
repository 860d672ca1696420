/*!
 * Instrumented Condition Variable
 *
 * Wraps `parking_lot::Condvar`, paired 1:1 with one [`InstrumentedMutex`]
 * for its lifetime; wait timing reuses the mutex's statistics sink, clock,
 * and tag. Waiting without holding the paired lock is a caller programming
 * error, checked by debug assertion only.
 */

use crate::stats::Histogram;
use crate::sync::instrument::Instrumentation;
use crate::sync::mutex::{InstrumentedMutex, InstrumentedMutexGuard};
use parking_lot::Condvar;
use std::time::Duration;

/// Condition variable bound to one instrumented mutex.
pub struct InstrumentedCondvar {
    cond: Condvar,
    instr: Instrumentation,
    mutex_id: u64,
}

impl InstrumentedCondvar {
    /// Create a condvar paired with `mutex`. The pairing is permanent.
    pub fn new<T>(mutex: &InstrumentedMutex<T>) -> Self {
        Self {
            cond: Condvar::new(),
            instr: mutex.instrumentation().clone(),
            mutex_id: mutex.id(),
        }
    }

    /// Atomically release the lock, block until signaled, and reacquire.
    ///
    /// No spurious-wakeup filtering at this layer: callers recheck their
    /// predicate in a loop, per standard condition-variable usage. Wait
    /// time is recorded into [`Histogram::CondWaitNanos`] under the same
    /// gating as the mutex's lock timing.
    pub fn wait<T>(&self, guard: &mut InstrumentedMutexGuard<'_, T>) {
        let _timer = self.instr.start_timer(Histogram::CondWaitNanos);
        self.wait_internal(guard);
    }

    fn wait_internal<T>(&self, guard: &mut InstrumentedMutexGuard<'_, T>) {
        debug_assert_eq!(
            guard.mutex_id(),
            self.mutex_id,
            "condvar waited on with a mutex it is not paired with"
        );
        #[cfg(debug_assertions)]
        crate::thread_state::report_state_delay(crate::thread_state::ThreadState::MutexWait);

        self.cond.wait(guard.raw_guard_mut());
    }

    /// Wait until signaled or the absolute deadline passes.
    ///
    /// `deadline_micros` is microseconds in the clock's epoch, so repeated
    /// calls with the same deadline are immune to timer drift. Returns
    /// `true` iff the deadline was reached; `false` means a signal or
    /// spurious wakeup. A deadline already in the past returns `true`
    /// immediately.
    pub fn timed_wait<T>(
        &self,
        guard: &mut InstrumentedMutexGuard<'_, T>,
        deadline_micros: u64,
    ) -> bool {
        let _timer = self.instr.start_timer(Histogram::CondWaitNanos);
        self.timed_wait_internal(guard, deadline_micros)
    }

    fn timed_wait_internal<T>(
        &self,
        guard: &mut InstrumentedMutexGuard<'_, T>,
        mut deadline_micros: u64,
    ) -> bool {
        debug_assert_eq!(
            guard.mutex_id(),
            self.mutex_id,
            "condvar waited on with a mutex it is not paired with"
        );
        #[cfg(debug_assertions)]
        crate::thread_state::report_state_delay(crate::thread_state::ThreadState::MutexWait);

        crate::sync_point!("InstrumentedCondvar::timed_wait", &mut deadline_micros);

        let now_micros = self.instr.clock_or_default().now_micros();
        let timeout = Duration::from_micros(deadline_micros.saturating_sub(now_micros));
        self.cond.wait_for(guard.raw_guard_mut(), timeout).timed_out()
    }

    /// Wake one waiter. Uninstrumented.
    pub fn signal(&self) {
        self.cond.notify_one();
    }

    /// Wake every waiter. Uninstrumented.
    pub fn signal_all(&self) {
        self.cond.notify_all();
    }
}
