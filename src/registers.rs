//! ## Register store
//! Holds `M = 2^P` one byte registers. A hash is split into its top `P` bits, which address a
//! register, and its low `Q = BITS - P` bits, whose leading zero rank is kept as a running maximum
//! in that register. Ranks are in `[0, Q + 1]`, where `0` marks a register never touched and
//! `Q + 1` a register that saw an all-zero remainder.
//!
//! Register values only grow through `insert_hash`. The whole array can be replaced, in which
//! case the shape (`P`, `M`, `Q`) stays as constructed.

use std::fmt::{Debug, Formatter};

use crate::error::SketchError;
use crate::math::leading_zero_rank;
use crate::width::HashWidth;

/// Fixed-size array of per-register maximum ranks.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers<V: HashWidth> {
    ranks: Box<[u8]>,
    /// Number of top hash bits used as register index
    precision: u8,
    /// Number of registers, `2^precision`
    m: usize,
    /// Number of low hash bits used to compute rank
    q: u8,
    /// Mask selecting the `q` low hash bits
    q_mask: V,
}

impl<V: HashWidth> Registers<V> {
    /// Create zeroed registers for given precision.
    pub(crate) fn new(precision: u8) -> Result<Self, SketchError> {
        Self::validate(precision)?;
        Ok(Self::zeroed(precision))
    }

    /// Create registers for given precision from existing ranks, checking their count and range.
    pub(crate) fn from_ranks(precision: u8, ranks: Vec<u8>) -> Result<Self, SketchError> {
        Self::validate(precision)?;
        let mut registers = Self::with_ranks(precision, Box::default());
        registers.try_replace(ranks)?;
        Ok(registers)
    }

    /// Create zeroed registers, `precision` must be valid for `V`.
    pub(crate) fn zeroed(precision: u8) -> Self {
        Self::with_ranks(precision, vec![0; 1 << precision].into_boxed_slice())
    }

    fn validate(precision: u8) -> Result<(), SketchError> {
        if precision > V::BITS {
            return Err(SketchError::PrecisionOutOfRange {
                precision,
                max: V::BITS,
            });
        }
        1usize
            .checked_shl(u32::from(precision))
            .map(|_| ())
            .ok_or(SketchError::TooManyRegisters { precision })
    }

    fn with_ranks(precision: u8, ranks: Box<[u8]>) -> Self {
        let q = V::BITS - precision;
        // `q_mask = 2^q - 1`, shifting keeps both `q = BITS` and `q = 0` in range
        let q_mask = V::max_value()
            .checked_shr(u32::from(precision))
            .unwrap_or_else(V::zero);

        Self {
            ranks,
            precision,
            m: 1 << precision,
            q,
            q_mask,
        }
    }

    /// Number of top hash bits used as register index.
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers derived from precision.
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.m
    }

    /// Number of low hash bits used for rank computation.
    #[inline]
    pub fn q(&self) -> u8 {
        self.q
    }

    /// Largest rank a register can hold, `q + 1`.
    #[inline]
    pub fn max_rank(&self) -> u8 {
        self.q + 1
    }

    /// Raw register values in index order.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.ranks
    }

    /// Update register addressed by `hash` with the rank of its remainder.
    #[inline]
    pub(crate) fn insert_hash(&mut self, hash: V) {
        let idx: usize = hash
            .checked_shr(u32::from(self.q))
            .unwrap_or_else(V::zero)
            .as_();
        let rank = leading_zero_rank(hash & self.q_mask, self.precision);
        let register = &mut self.ranks[idx];
        if rank > *register {
            *register = rank;
        }
    }

    /// Histogram of register values: `c[k]` is the number of registers equal to `k`.
    ///
    /// The returned vector has `q + 2` elements, indices `0..=q + 1`.
    ///
    /// # Panics
    /// If the register count differs from `m` or a register holds a rank above `q + 1`, which can
    /// only happen after an unchecked `replace`.
    pub fn multiplicity(&self) -> Vec<usize> {
        assert_eq!(
            self.ranks.len(),
            self.m,
            "register count does not match precision"
        );
        let mut c = vec![0; usize::from(self.q) + 2];
        for &rank in self.ranks.iter() {
            c[usize::from(rank)] += 1;
        }
        c
    }

    /// Replace register array without validation.
    #[inline]
    pub(crate) fn replace(&mut self, ranks: Vec<u8>) {
        self.ranks = ranks.into_boxed_slice();
    }

    /// Replace register array after checking its length and value range.
    pub(crate) fn try_replace(&mut self, ranks: Vec<u8>) -> Result<(), SketchError> {
        if ranks.len() != self.m {
            return Err(SketchError::RegisterCountMismatch {
                expected: self.m,
                actual: ranks.len(),
            });
        }
        let max = self.max_rank();
        if let Some(index) = ranks.iter().position(|&rank| rank > max) {
            return Err(SketchError::RegisterOutOfRange {
                index,
                value: ranks[index],
                max,
            });
        }
        self.replace(ranks);
        Ok(())
    }
}

impl<V: HashWidth> Debug for Registers<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registers {{ precision: {}, m: {}, q: {} }}",
            self.precision, self.m, self.q
        )
    }
}
