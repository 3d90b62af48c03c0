//! HyperLogLog sketch over pre-hashed values.
//!
//! The sketch is defined by a precision `P` and an estimator:
//! - `P`: number of top hash bits used as register index, `M = 2^P` registers are kept.
//!   It is in `[0..BITS]` range for hash width `BITS` (32 or 64).
//! - estimator: one of `Classic`, `Improved` or `MaximumLikelihood`, see `EstimatorKind`.
//!
//! The sketch never hashes items itself, callers feed uniformly distributed hashes of the sketch
//! width into `insert_hash`. Register values can be read and replaced to persist a sketch or to
//! combine sketches outside of this crate.
//!
//! Expected standard error is `1.04 / sqrt(M)`:
//! - P = 10: 3.25%
//! - P = 12: 1.62%
//! - P = 14: 0.81%

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use tracing::debug;

use crate::error::SketchError;
use crate::estimator::{Estimator, EstimatorKind, EstimatorTrait};
use crate::registers::Registers;
use crate::width::HashWidth;

/// Precision used by `HyperLogLog::default`
pub const DEFAULT_PRECISION: u8 = 12;

/// Ensure that default precision fits both hash widths at compile time
const _: () = assert!(DEFAULT_PRECISION <= 32);

/// HyperLogLog sketch for hashes of type `V` (`u32` or `u64`).
#[derive(Clone, PartialEq)]
pub struct HyperLogLog<V: HashWidth = u64> {
    registers: Registers<V>,
    estimator: Estimator,
}

impl<V: HashWidth> HyperLogLog<V> {
    /// Creates new sketch with `2^precision` registers and given estimator.
    ///
    /// Fails if `precision` exceeds the hash width or the register count is not addressable.
    pub fn new(precision: u8, kind: EstimatorKind) -> Result<Self, SketchError> {
        let registers = Registers::new(precision)?;
        debug!(
            precision,
            registers = registers.num_registers(),
            estimator = %kind,
            "created HyperLogLog sketch"
        );
        Ok(Self {
            registers,
            estimator: Estimator::new(kind, precision),
        })
    }

    /// Creates new sketch using classical bias corrected estimator.
    pub fn classic(precision: u8) -> Result<Self, SketchError> {
        Self::new(precision, EstimatorKind::Classic)
    }

    /// Creates new sketch using improved estimator.
    pub fn improved(precision: u8) -> Result<Self, SketchError> {
        Self::new(precision, EstimatorKind::Improved)
    }

    /// Creates new sketch using maximum-likelihood estimator.
    pub fn maximum_likelihood(precision: u8) -> Result<Self, SketchError> {
        Self::new(precision, EstimatorKind::MaximumLikelihood)
    }

    /// Creates new sketch with the smallest precision whose standard error `1.04 / sqrt(M)` does
    /// not exceed `epsilon`.
    pub fn with_error(epsilon: f64, kind: EstimatorKind) -> Result<Self, SketchError> {
        if !(0.0 < epsilon && epsilon < 1.0) {
            return Err(SketchError::InvalidErrorRate(epsilon));
        }
        let m = (1.04 / epsilon).powi(2);
        let precision = m.log2().ceil().min(f64::from(u8::MAX)) as u8;
        Self::new(precision, kind)
    }

    /// Restores sketch from previously read registers.
    ///
    /// Registers are checked to have `2^precision` values, each at most `BITS - precision + 1`.
    pub fn from_registers(
        precision: u8,
        kind: EstimatorKind,
        registers: Vec<u8>,
    ) -> Result<Self, SketchError> {
        Ok(Self {
            registers: Registers::from_ranks(precision, registers)?,
            estimator: Estimator::new(kind, precision),
        })
    }

    /// Insert hashed value into the sketch. Updates at most one register.
    #[inline]
    pub fn insert_hash(&mut self, hash: V) {
        self.registers.insert_hash(hash);
    }

    /// Return cardinality estimate.
    ///
    /// `V::MAX` means the estimate is out of representable range, which happens once all
    /// registers are saturated.
    ///
    /// # Panics
    /// If registers were replaced by `set_registers` with an array of a different length or
    /// with ranks above `BITS - precision + 1`.
    #[inline]
    pub fn estimate(&self) -> V {
        self.estimator.estimate(&self.registers)
    }

    /// Return cardinality estimate computed by another estimator over the same registers.
    pub fn estimate_with(&self, kind: EstimatorKind) -> V {
        if kind == self.estimator.kind() {
            return self.estimate();
        }
        Estimator::new(kind, self.precision()).estimate(&self.registers)
    }

    /// Raw register values in index order.
    #[inline]
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    /// Replace all registers.
    ///
    /// Precision and register count stay as constructed, caller must pass exactly
    /// `num_registers()` values in `[0, BITS - precision + 1]` range.
    #[inline]
    pub fn set_registers(&mut self, registers: Vec<u8>) {
        self.registers.replace(registers);
    }

    /// Replace all registers after checking their count and value range.
    ///
    /// Registers are left untouched on error.
    pub fn try_set_registers(&mut self, registers: Vec<u8>) -> Result<(), SketchError> {
        self.registers.try_replace(registers)
    }

    /// Histogram of register values, see `Registers::multiplicity`.
    pub fn multiplicity(&self) -> Vec<usize> {
        self.registers.multiplicity()
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.registers.precision()
    }

    #[inline]
    pub fn num_registers(&self) -> usize {
        self.registers.num_registers()
    }

    #[inline]
    pub fn kind(&self) -> EstimatorKind {
        self.estimator.kind()
    }

    /// Return memory size of the sketch in bytes.
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.as_slice().len()
    }
}

impl<V: HashWidth> Default for HyperLogLog<V> {
    fn default() -> Self {
        Self {
            registers: Registers::zeroed(DEFAULT_PRECISION),
            estimator: Estimator::new(EstimatorKind::default(), DEFAULT_PRECISION),
        }
    }
}

impl<V: HashWidth> Debug for HyperLogLog<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ estimator: {}, precision: {}, estimate: {} }}",
            self.kind(),
            self.precision(),
            self.estimate()
        )
    }
}
