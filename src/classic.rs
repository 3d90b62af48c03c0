//! ## Classical estimator
//! Harmonic mean of `2^-register` with the empirical `alpha` bias constant, followed by one of
//! three range corrections:
//! - `E <= 2.5 * M`: linear counting over empty registers (if there are any)
//! - `E <= 2^32 / 30`: raw estimate
//! - otherwise: large range correction `-2^32 * ln(1 - E / 2^32)`
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! Thresholds and the large range correction use `2^32` for both 32 and 64 bit hashes.

use crate::estimator::{EstimatorKind, EstimatorTrait};
use crate::registers::Registers;
use crate::width::HashWidth;

const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Classic {
    /// Number of registers as `f64`
    m: f64,
    /// Bias corrected numerator `alpha * m^2`
    alpha_m2: f64,
    /// Upper bound of small range
    low_bound: f64,
    /// Upper bound of middle range
    middle_bound: f64,
}

impl Classic {
    /// Create classical estimator for registers of given precision.
    pub fn new(precision: u8) -> Self {
        let m = 2f64.powi(i32::from(precision));
        Self {
            m,
            alpha_m2: alpha(m) * m * m,
            low_bound: 2.5 * m,
            middle_bound: TWO_POW_32 / 30.0,
        }
    }

    /// Return uncorrected estimate and number of empty registers.
    pub(crate) fn raw_estimate(&self, ranks: &[u8]) -> (f64, usize) {
        let mut sum = 0.0;
        let mut empty = 0;
        for &rank in ranks {
            if rank == 0 {
                empty += 1;
                sum += 1.0;
            } else {
                sum += 2f64.powi(-i32::from(rank));
            }
        }
        (self.alpha_m2 / sum, empty)
    }

    /// Apply range dependent correction to raw estimate.
    pub(crate) fn correct(&self, estimate: f64, empty: usize) -> f64 {
        if estimate <= self.low_bound {
            if empty != 0 {
                return self.m * (self.m / empty as f64).ln();
            }
            return estimate;
        }
        if estimate <= self.middle_bound {
            return estimate;
        }
        if estimate >= TWO_POW_32 {
            // logarithm below is undefined, report saturation
            return f64::INFINITY;
        }
        -TWO_POW_32 * (1.0 - estimate / TWO_POW_32).ln()
    }
}

impl EstimatorTrait for Classic {
    #[inline]
    fn estimate<V: HashWidth>(&self, registers: &Registers<V>) -> V {
        let (estimate, empty) = self.raw_estimate(registers.as_slice());
        V::from_estimate(self.correct(estimate, empty))
    }

    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Classic
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: f64) -> f64 {
    match m as usize {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m),
    }
}
