use std::fmt::{Display, Formatter};

use enum_dispatch::enum_dispatch;

use crate::classic::Classic;
use crate::improved::Improved;
use crate::mle::MaximumLikelihood;
use crate::registers::Registers;
use crate::width::HashWidth;

/// Cardinality estimation algorithms which can read a HyperLogLog register array.
///
/// All of them share the same register layout and update rule, they only differ in how
/// registers are turned into an estimate.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch]
pub enum Estimator {
    Classic(Classic),
    Improved(Improved),
    MaximumLikelihood(MaximumLikelihood),
}

/// Estimator trait which must be implemented by all estimators.
#[enum_dispatch(Estimator)]
pub trait EstimatorTrait {
    /// Return cardinality estimate of `registers`. Never mutates registers.
    fn estimate<V: HashWidth>(&self, registers: &Registers<V>) -> V;
    /// Return kind of the estimator.
    fn kind(&self) -> EstimatorKind;
}

/// Selector of the estimation algorithm used by a sketch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EstimatorKind {
    /// Harmonic mean with empirical bias constant and small/large range corrections.
    Classic,
    /// Harmonic sum over register histogram with `sigma`/`tau` corrections.
    #[default]
    Improved,
    /// Maximum-likelihood solve over register histogram.
    MaximumLikelihood,
}

impl Estimator {
    /// Create estimator of given kind for registers of given precision.
    pub fn new(kind: EstimatorKind, precision: u8) -> Self {
        match kind {
            EstimatorKind::Classic => Estimator::Classic(Classic::new(precision)),
            EstimatorKind::Improved => Estimator::Improved(Improved),
            EstimatorKind::MaximumLikelihood => Estimator::MaximumLikelihood(MaximumLikelihood),
        }
    }
}

impl Display for EstimatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EstimatorKind::Classic => "classic",
            EstimatorKind::Improved => "improved",
            EstimatorKind::MaximumLikelihood => "maximum-likelihood",
        };
        f.write_str(name)
    }
}
