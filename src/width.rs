//! ## Hash widths
//! The sketch consumes already-hashed integers of exactly 32 or 64 bits. `HashWidth` is sealed,
//! so the set of supported widths is closed at compile time and no other integer type can be
//! used to build a sketch.

use std::fmt::{Debug, Display};

use num_traits::{AsPrimitive, CheckedShr, PrimInt, Unsigned};

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Unsigned integer type of a hash value fed into the sketch.
///
/// Implemented for `u32` and `u64` only.
pub trait HashWidth:
    sealed::Sealed
    + PrimInt
    + Unsigned
    + CheckedShr
    + AsPrimitive<usize>
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Number of bits in the hash domain.
    const BITS: u8;

    /// Convert floating point estimate into hash width integer.
    ///
    /// Fractional part is truncated, values above `Self::MAX` (including `+inf`) saturate
    /// and NaN becomes zero.
    fn from_estimate(estimate: f64) -> Self;
}

impl HashWidth for u32 {
    const BITS: u8 = 32;

    #[inline]
    fn from_estimate(estimate: f64) -> Self {
        estimate as u32
    }
}

impl HashWidth for u64 {
    const BITS: u8 = 64;

    #[inline]
    fn from_estimate(estimate: f64) -> Self {
        estimate as u64
    }
}
