/*!
 * Chaos-Mode Scheduling Perturbation
 *
 * Compiled only under the `chaos` feature (default off, never for
 * production). At background-work lock acquisitions, randomly signal the
 * lock's background condvar then either yield or sleep up to 10ms, widening
 * the distribution of thread interleavings exercised by tests. Affects
 * timing only, never correctness.
 */

use crate::sync::instrument::{Instrumentation, WaitTag};
use crate::time::{Clock, SystemClock};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(301));
}

/// Perturb scheduling before a background-work lock acquisition.
pub(crate) fn perturb(instr: &Instrumentation) {
    if instr.tag() != WaitTag::BackgroundWork {
        return;
    }

    if RNG.with(|rng| rng.borrow_mut().gen_bool(0.5)) {
        if let Some(signal) = instr.bg_signal() {
            signal.signal_all();
        }
        std::thread::yield_now();
    } else {
        let sleep_micros = RNG.with(|rng| rng.borrow_mut().gen_range(0..11u64)) * 1_000;
        if let Some(signal) = instr.bg_signal() {
            signal.signal_all();
        }
        log::trace!("chaos perturbation: sleeping {}us before lock", sleep_micros);
        SystemClock::default_instance().sleep_micros(sleep_micros);
    }
}
