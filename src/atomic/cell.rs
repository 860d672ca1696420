/*!
 * Ordering-Policy Atomic Cells
 *
 * `std::sync::atomic` is easy to misuse: ordering is chosen per call site,
 * so one caller can silently weaken an ordering another caller relies on.
 * These wrappers bind a cell to exactly one of two sanctioned policies at
 * the type level, so mixing policies incorrectly is a type mismatch rather
 * than a runtime bug.
 *
 * # Choosing a cell
 *
 * - [`RelaxedCell`]: atomicity only, no cross-variable ordering. For values
 *   whose reads/writes never guard other memory: counters, monitoring
 *   stats, sequence allocators.
 * - [`AcqRelCell`]: general-purpose. Any cell read/written across threads
 *   where relative ordering with other memory matters (e.g. a "data ready"
 *   flag guarding data written earlier by the same thread).
 *
 * Nothing here needs sequential consistency: cross-writer ordering for
 * engine users is provided by explicit sequence numbering above this layer.
 */

use super::raw::{RawAtomic, RawAtomicBits, RawAtomicInt};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::Ordering;

/// Atomic cell whose every operation uses `Ordering::Relaxed`.
///
/// Guarantees atomicity of each operation and nothing about the ordering of
/// other memory accesses around it. Never blocks.
pub struct RelaxedCell<T: RawAtomic> {
    repr: T::Repr,
}

impl<T: RawAtomic> RelaxedCell<T> {
    /// Create a cell holding `initial`.
    #[inline]
    pub fn new(initial: T) -> Self {
        Self {
            repr: initial.into_repr(),
        }
    }

    #[inline]
    pub fn load(&self) -> T {
        T::load(&self.repr, Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, desired: T) {
        T::store(&self.repr, desired, Ordering::Relaxed)
    }

    /// Replace the value, returning the previous one.
    #[inline]
    pub fn exchange(&self, desired: T) -> T {
        T::swap(&self.repr, desired, Ordering::Relaxed)
    }

    /// Weak compare-and-swap. May fail spuriously even when the current
    /// value equals `*expected`; intended for retry loops where a spurious
    /// failure costs one extra iteration. On failure the observed current
    /// value is written back into `expected`.
    #[inline]
    pub fn cas_weak(&self, expected: &mut T, desired: T) -> bool {
        match T::compare_exchange_weak(
            &self.repr,
            *expected,
            desired,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => true,
            Err(actual) => {
                *expected = actual;
                false
            }
        }
    }

    /// Strong compare-and-swap: succeeds whenever the current value equals
    /// `*expected`, no spurious failures. On failure the observed current
    /// value is written back into `expected`.
    #[inline]
    pub fn cas_strong(&self, expected: &mut T, desired: T) -> bool {
        match T::compare_exchange(
            &self.repr,
            *expected,
            desired,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => true,
            Err(actual) => {
                *expected = actual;
                false
            }
        }
    }

    #[inline]
    pub(crate) fn repr(&self) -> &T::Repr {
        &self.repr
    }
}

impl<T: RawAtomicBits> RelaxedCell<T> {
    /// Bitwise AND, returning the value prior to the modification.
    #[inline]
    pub fn fetch_and(&self, operand: T) -> T {
        T::fetch_and(&self.repr, operand, Ordering::Relaxed)
    }

    /// Bitwise OR, returning the value prior to the modification.
    #[inline]
    pub fn fetch_or(&self, operand: T) -> T {
        T::fetch_or(&self.repr, operand, Ordering::Relaxed)
    }

    /// Bitwise XOR, returning the value prior to the modification.
    #[inline]
    pub fn fetch_xor(&self, operand: T) -> T {
        T::fetch_xor(&self.repr, operand, Ordering::Relaxed)
    }
}

impl<T: RawAtomicInt> RelaxedCell<T> {
    /// Add, returning the value prior to the modification.
    #[inline]
    pub fn fetch_add(&self, operand: T) -> T {
        T::fetch_add(&self.repr, operand, Ordering::Relaxed)
    }

    /// Subtract, returning the value prior to the modification.
    #[inline]
    pub fn fetch_sub(&self, operand: T) -> T {
        T::fetch_sub(&self.repr, operand, Ordering::Relaxed)
    }
}

impl<T: RawAtomic + Default> Default for RelaxedCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: RawAtomic + fmt::Debug> fmt::Debug for RelaxedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelaxedCell").field(&self.load()).finish()
    }
}

/// Atomic cell with acquire-release ordering on every operation.
///
/// `load` is acquire, `store` is release, and `exchange`/CAS/fetch-ops are
/// acquire-release (CAS failure loads are acquire). If thread A performs a
/// release operation here and thread B's acquire operation observes the
/// value A stored, every write visible to A before its release is visible
/// to B after its acquire.
///
/// The cell derefs to its [`RelaxedCell`] view, so relaxed operations can
/// be mixed in at call sites that do not need the ordering guarantee (e.g.
/// a monitoring-only read via `cell.relaxed().load()`).
pub struct AcqRelCell<T: RawAtomic> {
    inner: RelaxedCell<T>,
}

impl<T: RawAtomic> AcqRelCell<T> {
    /// Create a cell holding `initial`.
    #[inline]
    pub fn new(initial: T) -> Self {
        Self {
            inner: RelaxedCell::new(initial),
        }
    }

    /// Acquire load.
    #[inline]
    pub fn load(&self) -> T {
        T::load(self.inner.repr(), Ordering::Acquire)
    }

    /// Release store.
    #[inline]
    pub fn store(&self, desired: T) {
        T::store(self.inner.repr(), desired, Ordering::Release)
    }

    /// Acquire-release swap, returning the previous value.
    #[inline]
    pub fn exchange(&self, desired: T) -> T {
        T::swap(self.inner.repr(), desired, Ordering::AcqRel)
    }

    /// Weak compare-and-swap, acquire-release on success, acquire on
    /// failure. Same spurious-failure and `expected` write-back contract as
    /// [`RelaxedCell::cas_weak`].
    #[inline]
    pub fn cas_weak(&self, expected: &mut T, desired: T) -> bool {
        match T::compare_exchange_weak(
            self.inner.repr(),
            *expected,
            desired,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => true,
            Err(actual) => {
                *expected = actual;
                false
            }
        }
    }

    /// Strong compare-and-swap, acquire-release on success, acquire on
    /// failure. No spurious failures.
    #[inline]
    pub fn cas_strong(&self, expected: &mut T, desired: T) -> bool {
        match T::compare_exchange(
            self.inner.repr(),
            *expected,
            desired,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => true,
            Err(actual) => {
                *expected = actual;
                false
            }
        }
    }

    /// Relaxed view of the same cell, for call sites that do not need the
    /// ordering guarantee.
    #[inline]
    pub fn relaxed(&self) -> &RelaxedCell<T> {
        &self.inner
    }
}

impl<T: RawAtomicBits> AcqRelCell<T> {
    /// Acquire-release bitwise AND, returning the prior value.
    #[inline]
    pub fn fetch_and(&self, operand: T) -> T {
        T::fetch_and(self.inner.repr(), operand, Ordering::AcqRel)
    }

    /// Acquire-release bitwise OR, returning the prior value.
    #[inline]
    pub fn fetch_or(&self, operand: T) -> T {
        T::fetch_or(self.inner.repr(), operand, Ordering::AcqRel)
    }

    /// Acquire-release bitwise XOR, returning the prior value.
    #[inline]
    pub fn fetch_xor(&self, operand: T) -> T {
        T::fetch_xor(self.inner.repr(), operand, Ordering::AcqRel)
    }
}

impl<T: RawAtomicInt> AcqRelCell<T> {
    /// Acquire-release add, returning the prior value.
    #[inline]
    pub fn fetch_add(&self, operand: T) -> T {
        T::fetch_add(self.inner.repr(), operand, Ordering::AcqRel)
    }

    /// Acquire-release subtract, returning the prior value.
    #[inline]
    pub fn fetch_sub(&self, operand: T) -> T {
        T::fetch_sub(self.inner.repr(), operand, Ordering::AcqRel)
    }
}

impl<T: RawAtomic> Deref for AcqRelCell<T> {
    type Target = RelaxedCell<T>;

    fn deref(&self) -> &RelaxedCell<T> {
        &self.inner
    }
}

impl<T: RawAtomic + Default> Default for AcqRelCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: RawAtomic + fmt::Debug> fmt::Debug for AcqRelCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AcqRelCell").field(&self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_relaxed_sequential_semantics() {
        let cell = RelaxedCell::new(10u64);
        assert_eq!(cell.load(), 10);

        cell.store(7);
        assert_eq!(cell.load(), 7);

        assert_eq!(cell.exchange(3), 7);
        assert_eq!(cell.fetch_add(5), 3);
        assert_eq!(cell.fetch_sub(2), 8);
        assert_eq!(cell.fetch_or(0b1000), 6);
        assert_eq!(cell.fetch_and(0b1100), 14);
        assert_eq!(cell.fetch_xor(0b0101), 12);
        assert_eq!(cell.load(), 9);
    }

    #[test]
    fn test_default_is_zero_value() {
        let cell: RelaxedCell<u32> = RelaxedCell::default();
        assert_eq!(cell.load(), 0);

        let flag: AcqRelCell<bool> = AcqRelCell::default();
        assert!(!flag.load());
    }

    #[test]
    fn test_cas_strong_succeeds_on_match() {
        let cell = AcqRelCell::new(42u32);
        let mut expected = 42u32;
        assert!(cell.cas_strong(&mut expected, 99));
        assert_eq!(cell.load(), 99);
        assert_eq!(expected, 42);
    }

    #[test]
    fn test_cas_failure_writes_back_observed_value() {
        let cell = RelaxedCell::new(5u64);
        let mut expected = 17u64;
        assert!(!cell.cas_strong(&mut expected, 1));
        assert_eq!(expected, 5);
        assert_eq!(cell.load(), 5);

        // After write-back the retry succeeds.
        assert!(cell.cas_strong(&mut expected, 1));
        assert_eq!(cell.load(), 1);
    }

    #[test]
    fn test_cas_weak_retry_loop() {
        let cell = AcqRelCell::new(0u64);
        let mut current = cell.load();
        loop {
            let next = current + 1;
            if cell.cas_weak(&mut current, next) {
                break;
            }
        }
        assert_eq!(cell.load(), 1);
    }

    #[test]
    fn test_bool_cell_bit_ops() {
        let flag = RelaxedCell::new(false);
        assert!(!flag.fetch_or(true));
        assert!(flag.load());
        assert!(flag.fetch_and(false));
        assert!(!flag.load());
        assert!(!flag.fetch_xor(true));
        assert!(flag.load());
    }

    #[test]
    fn test_acqrel_relaxed_view_shares_storage() {
        let cell = AcqRelCell::new(11u64);
        cell.relaxed().store(12);
        assert_eq!(cell.load(), 12);
        cell.store(13);
        assert_eq!(cell.relaxed().load(), 13);
    }

    #[test]
    fn test_signed_fetch_sub_wraps_through_zero() {
        let cell = RelaxedCell::new(1i32);
        assert_eq!(cell.fetch_sub(3), 1);
        assert_eq!(cell.load(), -2);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Store(u64),
        Exchange(u64),
        FetchAdd(u64),
        FetchSub(u64),
        FetchAnd(u64),
        FetchOr(u64),
        FetchXor(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u64>().prop_map(Op::Store),
            any::<u64>().prop_map(Op::Exchange),
            any::<u64>().prop_map(Op::FetchAdd),
            any::<u64>().prop_map(Op::FetchSub),
            any::<u64>().prop_map(Op::FetchAnd),
            any::<u64>().prop_map(Op::FetchOr),
            any::<u64>().prop_map(Op::FetchXor),
        ]
    }

    proptest! {
        // Single-threaded, every op must match plain sequential arithmetic.
        #[test]
        fn prop_single_thread_matches_scalar_model(init in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..64)) {
            let cell = RelaxedCell::new(init);
            let mut model = init;

            for op in ops {
                match op {
                    Op::Store(v) => {
                        cell.store(v);
                        model = v;
                    }
                    Op::Exchange(v) => {
                        prop_assert_eq!(cell.exchange(v), model);
                        model = v;
                    }
                    Op::FetchAdd(v) => {
                        prop_assert_eq!(cell.fetch_add(v), model);
                        model = model.wrapping_add(v);
                    }
                    Op::FetchSub(v) => {
                        prop_assert_eq!(cell.fetch_sub(v), model);
                        model = model.wrapping_sub(v);
                    }
                    Op::FetchAnd(v) => {
                        prop_assert_eq!(cell.fetch_and(v), model);
                        model &= v;
                    }
                    Op::FetchOr(v) => {
                        prop_assert_eq!(cell.fetch_or(v), model);
                        model |= v;
                    }
                    Op::FetchXor(v) => {
                        prop_assert_eq!(cell.fetch_xor(v), model);
                        model ^= v;
                    }
                }
                prop_assert_eq!(cell.load(), model);
            }
        }
    }
}
