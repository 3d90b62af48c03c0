//! ## Improved estimator
//! Single pass over the register histogram `C` without range dependent branches:
//!
//! `E = M^2 / (2 ln 2) / (M * sigma(C[0] / M) + sum(C[k] * 2^-k) + M * tau(1 - C[Q + 1] / M) * 2^-Q)`
//!
//! The middle sum is folded from the top bucket down by halving, which keeps intermediate
//! values in range for any `Q`.

use std::f64::consts::LN_2;

use crate::estimator::{EstimatorKind, EstimatorTrait};
use crate::math::{sigma, tau};
use crate::registers::Registers;
use crate::width::HashWidth;

const A_INF: f64 = 1.0 / (2.0 * LN_2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Improved;

impl EstimatorTrait for Improved {
    /// # Panics
    /// If registers are corrupted, i.e. hold ranks above `q + 1` or their count differs from `m`.
    fn estimate<V: HashWidth>(&self, registers: &Registers<V>) -> V {
        let c = registers.multiplicity();
        let q = usize::from(registers.q());
        let m = registers.num_registers() as f64;

        let mut z = m * tau(1.0 - c[q + 1] as f64 / m);
        for k in (1..=q).rev() {
            z = 0.5 * (z + c[k] as f64);
        }
        z += m * sigma(c[0] as f64 / m);

        // Empty registers give `z = inf` and zero estimate, saturated registers give `z = 0`
        // and an infinite estimate which saturates to `V::MAX`.
        V::from_estimate((A_INF * (m * m) / z).round())
    }

    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Improved
    }
}
