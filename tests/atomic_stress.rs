/*!
 * Atomic Cell Stress Tests
 *
 * Multi-threaded properties of the ordering-policy cells: strong CAS never
 * fails spuriously, weak CAS retry loops converge, and release stores are
 * visible to acquire loads.
 */

use engine_sync::{AcqRelCell, RelaxedCell};
use rand::Rng;
use std::hint;
use std::sync::Arc;
use std::thread;

#[test]
fn test_cas_strong_no_spurious_failure_under_stress() {
    const THREADS: usize = 4;
    const ITERS: u64 = 10_000;

    // Each thread owns one cell (so the expected value is always exact)
    // while every thread hammers a shared scratch cell, keeping the
    // coherence traffic adversarial.
    let cells: Arc<Vec<AcqRelCell<u64>>> =
        Arc::new((0..THREADS).map(|_| AcqRelCell::new(0)).collect());
    let scratch = Arc::new(RelaxedCell::new(0u64));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cells = cells.clone();
            let scratch = scratch.clone();
            thread::spawn(move || {
                for i in 0..ITERS {
                    scratch.fetch_add(1);
                    let mut expected = i;
                    assert!(
                        cells[t].cas_strong(&mut expected, i + 1),
                        "strong CAS failed spuriously at iteration {i} (observed {expected})"
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for cell in cells.iter() {
        assert_eq!(cell.load(), ITERS);
    }
    assert_eq!(scratch.load(), THREADS as u64 * ITERS);
}

#[test]
fn test_cas_weak_retry_loop_converges_under_contention() {
    const THREADS: usize = 4;
    const INCREMENTS: u64 = 5_000;
    // A weak CAS may fail spuriously, but a retry loop must converge; a
    // million attempts for one increment means something is broken.
    const MAX_ATTEMPTS_PER_INCREMENT: u64 = 1_000_000;

    let cell = Arc::new(AcqRelCell::new(0u64));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cell = cell.clone();
            thread::spawn(move || {
                for _ in 0..INCREMENTS {
                    let mut current = cell.relaxed().load();
                    let mut attempts = 0u64;
                    loop {
                        let next = current + 1;
                        if cell.cas_weak(&mut current, next) {
                            break;
                        }
                        attempts += 1;
                        assert!(
                            attempts < MAX_ATTEMPTS_PER_INCREMENT,
                            "weak CAS retry loop failed to converge"
                        );
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cell.load(), THREADS as u64 * INCREMENTS);
}

#[test]
fn test_release_store_publishes_payload_to_acquire_load() {
    const ROUNDS: u64 = 200;

    let mut rng = rand::thread_rng();
    for round in 1..=ROUNDS {
        let value = rng.gen_range(1..u64::MAX);
        let payload = Arc::new(RelaxedCell::new(0u64));
        let ready = Arc::new(AcqRelCell::new(false));

        let writer = {
            let payload = payload.clone();
            let ready = ready.clone();
            thread::spawn(move || {
                payload.store(value);
                // Release store: the payload write above must be visible to
                // any thread whose acquire load observes `true`.
                ready.store(true);
            })
        };

        let reader = {
            let payload = payload.clone();
            let ready = ready.clone();
            thread::spawn(move || {
                while !ready.load() {
                    hint::spin_loop();
                }
                payload.load()
            })
        };

        writer.join().unwrap();
        assert_eq!(reader.join().unwrap(), value, "round {round}");
    }
}
