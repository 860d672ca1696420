/*!
 * Raw Atomic Mapping
 *
 * Maps plain scalars to their `std::sync::atomic` representation so the
 * ordering-policy cells can be generic over the stored type.
 */

use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};

/// A scalar with a lock-free atomic representation.
///
/// Implemented for the integer primitives and `bool`. Pointer-sized values
/// go through `usize`. All operations take explicit orderings; the cells in
/// [`crate::atomic`] fix the ordering per cell type so call sites never
/// choose one.
pub trait RawAtomic: Copy {
    /// The `std::sync::atomic` type backing this scalar.
    type Repr: Send + Sync;

    fn into_repr(self) -> Self::Repr;
    fn load(repr: &Self::Repr, order: Ordering) -> Self;
    fn store(repr: &Self::Repr, val: Self, order: Ordering);
    fn swap(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
    fn compare_exchange(
        repr: &Self::Repr,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;
    fn compare_exchange_weak(
        repr: &Self::Repr,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;
}

/// Bitwise read-modify-write support (integers and `bool`).
pub trait RawAtomicBits: RawAtomic {
    fn fetch_and(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
    fn fetch_or(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
    fn fetch_xor(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
}

/// Arithmetic read-modify-write support (integers only).
pub trait RawAtomicInt: RawAtomicBits {
    fn fetch_add(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
    fn fetch_sub(repr: &Self::Repr, val: Self, order: Ordering) -> Self;
}

macro_rules! delegate_raw_atomic {
    ($ty:ty, $repr:ty) => {
        impl RawAtomic for $ty {
            type Repr = $repr;

            #[inline]
            fn into_repr(self) -> $repr {
                <$repr>::new(self)
            }

            #[inline]
            fn load(repr: &$repr, order: Ordering) -> $ty {
                repr.load(order)
            }

            #[inline]
            fn store(repr: &$repr, val: $ty, order: Ordering) {
                repr.store(val, order)
            }

            #[inline]
            fn swap(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.swap(val, order)
            }

            #[inline]
            fn compare_exchange(
                repr: &$repr,
                current: $ty,
                new: $ty,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$ty, $ty> {
                repr.compare_exchange(current, new, success, failure)
            }

            #[inline]
            fn compare_exchange_weak(
                repr: &$repr,
                current: $ty,
                new: $ty,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$ty, $ty> {
                repr.compare_exchange_weak(current, new, success, failure)
            }
        }

        impl RawAtomicBits for $ty {
            #[inline]
            fn fetch_and(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.fetch_and(val, order)
            }

            #[inline]
            fn fetch_or(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.fetch_or(val, order)
            }

            #[inline]
            fn fetch_xor(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.fetch_xor(val, order)
            }
        }
    };
}

macro_rules! delegate_raw_atomic_int {
    ($ty:ty, $repr:ty) => {
        delegate_raw_atomic!($ty, $repr);

        impl RawAtomicInt for $ty {
            #[inline]
            fn fetch_add(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.fetch_add(val, order)
            }

            #[inline]
            fn fetch_sub(repr: &$repr, val: $ty, order: Ordering) -> $ty {
                repr.fetch_sub(val, order)
            }
        }
    };
}

delegate_raw_atomic_int!(u8, AtomicU8);
delegate_raw_atomic_int!(u16, AtomicU16);
delegate_raw_atomic_int!(u32, AtomicU32);
delegate_raw_atomic_int!(u64, AtomicU64);
delegate_raw_atomic_int!(usize, AtomicUsize);
delegate_raw_atomic_int!(i8, AtomicI8);
delegate_raw_atomic_int!(i16, AtomicI16);
delegate_raw_atomic_int!(i32, AtomicI32);
delegate_raw_atomic_int!(i64, AtomicI64);
delegate_raw_atomic_int!(isize, AtomicIsize);

// bool supports the bitwise fetch ops but not add/sub.
delegate_raw_atomic!(bool, AtomicBool);
