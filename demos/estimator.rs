use std::hash::{BuildHasher, BuildHasherDefault};

use hyperloglog_estimators::{EstimatorKind, HyperLogLog};
use wyhash::WyHash;

fn main() {
    // RUST_LOG=hyperloglog_estimators=trace shows every maximum-likelihood step
    tracing_subscriber::fmt::init();

    let hasher = BuildHasherDefault::<WyHash>::default();

    let mut estimator = HyperLogLog::<u64>::with_error(0.01, EstimatorKind::Improved).unwrap();
    for i in 0..100_000 {
        estimator.insert_hash(hasher.hash_one(i));
    }
    println!("estimator = {:?}", estimator);
    for kind in [
        EstimatorKind::Classic,
        EstimatorKind::Improved,
        EstimatorKind::MaximumLikelihood,
    ] {
        println!("{} estimate = {}", kind, estimator.estimate_with(kind));
    }

    let mut estimator32 = HyperLogLog::<u32>::maximum_likelihood(10).unwrap();
    for i in 0..1_000 {
        estimator32.insert_hash(hasher.hash_one(i) as u32);
    }
    println!("estimator32 = {:?}", estimator32);
}
