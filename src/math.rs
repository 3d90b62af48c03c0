//! Numeric helpers shared by the register update rule and the histogram based estimators.
//!
//! `sigma` and `tau` are the correction series for the lowest (empty registers) and highest
//! (saturated registers) buckets of the register histogram, see Otmar Ertl,
//! "New cardinality estimation algorithms for HyperLogLog sketches":
//! https://arxiv.org/abs/1702.01284
//!
//! Both series are evaluated until the partial sum stops changing in `f64`, the loop order must
//! stay exactly as written for estimates to be reproducible.

use crate::width::HashWidth;

/// Rank of a hash remainder: one plus the number of leading zeros of the `q` low bits.
///
/// `remainder` must have its `precision` top bits cleared, so the result is in `[1, q + 1]`
/// with `q + 1` returned for an all-zero remainder.
#[inline]
pub(crate) fn leading_zero_rank<V: HashWidth>(remainder: V, precision: u8) -> u8 {
    (remainder.leading_zeros() + 1 - u32::from(precision)) as u8
}

/// Empty register correction series.
///
/// # Panics
/// If `x` is outside of `[0, 1]`, which means the register histogram is corrupted.
pub fn sigma(x: f64) -> f64 {
    assert!((0.0..=1.0).contains(&x), "sigma is defined for 0 <= x <= 1");
    if x == 1.0 {
        return f64::INFINITY;
    }

    let mut x2 = x;
    let mut y = 1.0;
    let mut z = x2;
    loop {
        x2 *= x2;
        let z2 = z;
        z += x2 * y;
        y *= 2.0;
        if z == z2 {
            return z;
        }
    }
}

/// Saturated register correction series.
///
/// # Panics
/// If `x` is outside of `[0, 1]`, which means the register histogram is corrupted.
pub fn tau(x: f64) -> f64 {
    assert!((0.0..=1.0).contains(&x), "tau is defined for 0 <= x <= 1");
    if x == 0.0 || x == 1.0 {
        return 0.0;
    }

    let mut x2 = x;
    let mut y = 1.0;
    let mut z = 1.0 - x2;
    loop {
        x2 = x2.sqrt();
        let z2 = z;
        y *= 0.5;
        z -= (1.0 - x2).powi(2) * y;
        if z == z2 {
            return z / 3.0;
        }
    }
}
