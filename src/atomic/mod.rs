/*!
 * Atomic Primitives
 *
 * Generic atomic-value wrappers that bind a shared scalar to one of exactly
 * two memory-ordering policies, fixed at the type level:
 * - `RelaxedCell<T>`: atomicity only
 * - `AcqRelCell<T>`: acquire loads, release stores, acq-rel RMW
 *
 * Higher-level lock-free structures are built by consumers from these two
 * cells; this module deliberately provides nothing else.
 */

mod cell;
mod raw;

pub use cell::{AcqRelCell, RelaxedCell};
pub use raw::{RawAtomic, RawAtomicBits, RawAtomicInt};
