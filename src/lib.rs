//! `hyperloglog-estimators` is a Rust crate implementing the HyperLogLog cardinality sketch over
//! pre-hashed 32-bit or 64-bit values.
//!
//! A single register array can be read by three estimators: the classical bias corrected one,
//! the improved estimator and the maximum-likelihood estimator, the latter two following
//! Otmar Ertl, "New cardinality estimation algorithms for HyperLogLog sketches".
//!
//! ```
//! use hyperloglog_estimators::{EstimatorKind, HyperLogLog};
//!
//! let mut hll = HyperLogLog::<u64>::improved(12).unwrap();
//! for i in 0u64..1_000 {
//!     hll.insert_hash(i.wrapping_mul(0x9e37_79b9_7f4a_7c15));
//! }
//! assert!(hll.estimate() > 0);
//! assert!(hll.estimate_with(EstimatorKind::MaximumLikelihood) > 0);
//! ```
mod classic;
mod error;
pub mod estimator;
pub mod hyperloglog;
mod improved;
mod math;
mod mle;
pub mod registers;
#[cfg(feature = "with_serde")]
mod serde;
mod width;

pub use crate::classic::Classic;
pub use crate::error::SketchError;
pub use crate::estimator::{Estimator, EstimatorKind, EstimatorTrait};
pub use crate::hyperloglog::{HyperLogLog, DEFAULT_PRECISION};
pub use crate::improved::Improved;
pub use crate::math::{sigma, tau};
pub use crate::mle::MaximumLikelihood;
pub use crate::registers::Registers;
pub use crate::width::HashWidth;
