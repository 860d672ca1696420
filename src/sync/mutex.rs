/*!
 * Instrumented Mutex
 *
 * Wraps `parking_lot::Mutex` with optional lock-wait latency measurement
 * and optional chaos-mode scheduling perturbation. Acquisition is
 * infallible at this layer: the underlying primitive aborts on
 * unrecoverable OS-level lock failure rather than returning an error, so
 * lock/unlock carry no error type.
 */

use crate::atomic::RelaxedCell;
use crate::stats::Histogram;
use crate::sync::instrument::Instrumentation;
use parking_lot::{Mutex, MutexGuard};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

fn next_mutex_id() -> u64 {
    static NEXT_ID: OnceLock<RelaxedCell<u64>> = OnceLock::new();
    NEXT_ID
        .get_or_init(|| RelaxedCell::new(1))
        .fetch_add(1)
}

/// Mutex with optional lock-wait instrumentation.
///
/// State machine is `Unlocked -> Locked -> Unlocked`, no re-entrancy. The
/// tag and external collaborators are fixed at construction.
pub struct InstrumentedMutex<T> {
    mutex: Mutex<T>,
    instr: Instrumentation,
    // Identifies this mutex for condvar-pairing debug checks.
    id: u64,
}

impl<T> InstrumentedMutex<T> {
    /// Uninstrumented mutex with the `General` tag.
    pub fn new(value: T) -> Self {
        Self::with_instrumentation(value, Instrumentation::disabled(super::WaitTag::General))
    }

    pub fn with_instrumentation(value: T, instr: Instrumentation) -> Self {
        Self {
            mutex: Mutex::new(value),
            instr,
            id: next_mutex_id(),
        }
    }

    /// Acquire the lock, blocking until available.
    ///
    /// When the lock carries the background-work tag and a sufficiently
    /// verbose statistics sink, the time spent blocked is recorded into
    /// [`Histogram::MutexLockWaitNanos`]; the timer finalizes after the raw
    /// acquisition returns. Unlock is guard drop and is uninstrumented.
    pub fn lock(&self) -> InstrumentedMutexGuard<'_, T> {
        let _timer = self.instr.start_timer(Histogram::MutexLockWaitNanos);
        self.lock_internal()
    }

    fn lock_internal(&self) -> InstrumentedMutexGuard<'_, T> {
        #[cfg(debug_assertions)]
        crate::thread_state::report_state_delay(crate::thread_state::ThreadState::MutexWait);

        #[cfg(feature = "chaos")]
        super::chaos::perturb(&self.instr);

        InstrumentedMutexGuard {
            inner: self.mutex.lock(),
            mutex_id: self.id,
        }
    }

    pub(crate) fn instrumentation(&self) -> &Instrumentation {
        &self.instr
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

/// RAII guard for [`InstrumentedMutex`]; releases the lock on drop.
pub struct InstrumentedMutexGuard<'a, T> {
    inner: MutexGuard<'a, T>,
    mutex_id: u64,
}

impl<'a, T> InstrumentedMutexGuard<'a, T> {
    /// Temporarily release the lock, run `f`, then reacquire before
    /// returning. The reacquisition is uninstrumented.
    pub fn unlocked<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        MutexGuard::unlocked(&mut self.inner, f)
    }

    pub(crate) fn raw_guard_mut(&mut self) -> &mut MutexGuard<'a, T> {
        &mut self.inner
    }

    pub(crate) fn mutex_id(&self) -> u64 {
        self.mutex_id
    }
}

impl<T> Deref for InstrumentedMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for InstrumentedMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
