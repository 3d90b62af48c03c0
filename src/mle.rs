//! ## Maximum-likelihood estimator
//! Solves the likelihood equation of the register histogram `C` for the cardinality with a
//! secant iteration, starting from a closed-form guess. Each step evaluates
//!
//! `g(x) = x * a + C[Q + 1] * h(x / 2^Q) + sum(C[k] * h(x / 2^k))`, `k = Kmin..Kmax`
//!
//! where `h` is evaluated by the "ballistic" recurrence `h <- (x + h (1 - h)) / (x + 1 - h)`,
//! doubling `x` at every step, seeded from a series expansion at a small enough scale.
//! Iteration stops once the step is below `x * 0.01 / sqrt(M)`.
//!
//! Otmar Ertl, "New cardinality estimation algorithms for HyperLogLog sketches", Algorithm 8:
//! https://arxiv.org/abs/1702.01284

use tracing::{debug, trace};

use crate::estimator::{EstimatorKind, EstimatorTrait};
use crate::registers::Registers;
use crate::width::HashWidth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaximumLikelihood;

impl EstimatorTrait for MaximumLikelihood {
    /// Returns `V::MAX` when every register is saturated, the cardinality is out of
    /// representable range in that case.
    ///
    /// # Panics
    /// If registers are corrupted, i.e. hold ranks above `q + 1` or their count differs from `m`.
    fn estimate<V: HashWidth>(&self, registers: &Registers<V>) -> V {
        let c = registers.multiplicity();
        let q = usize::from(registers.q());
        let m = registers.num_registers();

        if c[q + 1] == m {
            debug!(
                precision = registers.precision(),
                "all registers saturated, estimate out of range"
            );
            return V::max_value();
        }

        let k_min = c.iter().position(|&ck| ck > 0).map_or(1, |k| k.max(1));
        let k_max = c.iter().rposition(|&ck| ck > 0).map_or(0, |k| k.min(q));

        let mut z = 0.0;
        for k in (k_min..=k_max).rev() {
            z = z / 2.0 + c[k] as f64;
        }
        z /= 2f64.powi(k_min as i32);

        let mut c_top = c[q + 1];
        if q >= 1 {
            c_top += c[k_max];
        }

        let a = z + c[0] as f64;
        let b = z + c[q + 1] as f64 / 2f64.powi(q as i32);
        let m1 = (m - c[0]) as f64;

        let mut x = if b <= 1.5 * a {
            m1 / (b / 2.0 + a)
        } else {
            (m1 / b) * (1.0 + b / a).ln()
        };

        let mut g_prev = 0.0;
        let mut delta_x = x;
        let sigma = 0.01 / (m as f64).sqrt();
        let mut iteration = 0u32;
        while delta_x > x * sigma {
            let ks = 2.0 + x.log2().floor();
            let degree = (k_max as f64).max(ks);

            let mut x1 = x / 2f64.powi(degree as i32 + 1);
            let x11 = x1 * x1;
            let mut h = x1 - x11 / 3.0 + (x11 * x11) * (1.0 / 45.0 - x11 / 472.5);
            let mut k = ks - 1.0;
            while k >= k_max as f64 {
                h = (x1 + h * (1.0 - h)) / (x1 + 1.0 - h);
                x1 *= 2.0;
                k -= 1.0;
            }

            let mut g = c_top as f64 * h;
            for k in (k_min..k_max).rev() {
                h = (x1 + h * (1.0 - h)) / (x1 + 1.0 - h);
                g += c[k] as f64 * h;
                x1 *= 2.0;
            }
            g += x * a;

            if g > g_prev && m1 >= g {
                delta_x = delta_x * (m1 - g) / (g - g_prev);
            } else {
                delta_x = 0.0;
            }
            x += delta_x;
            g_prev = g;

            iteration += 1;
            trace!(iteration, x, delta_x, g, "maximum likelihood step");
        }

        V::from_estimate((m as f64 * x).round())
    }

    fn kind(&self) -> EstimatorKind {
        EstimatorKind::MaximumLikelihood
    }
}
