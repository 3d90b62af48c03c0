#![no_main]

use hyperloglog_estimators::{EstimatorKind, HyperLogLog};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

const KINDS: [EstimatorKind; 3] = [
    EstimatorKind::Classic,
    EstimatorKind::Improved,
    EstimatorKind::MaximumLikelihood,
];

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let (header, items) = data.split_at(2);
    let kind = KINDS[usize::from(header[0]) % KINDS.len()];

    // smaller precisions make the classical estimate round down to zero
    let precision = 4 + header[1] % 15;
    let mut estimator64 = match HyperLogLog::<u64>::new(precision, kind) {
        Ok(estimator) => estimator,
        Err(_) => return,
    };
    let mut estimator32 = match HyperLogLog::<u32>::new(precision, kind) {
        Ok(estimator) => estimator,
        Err(_) => return,
    };

    for chunk in items.chunks(4) {
        let hash = wyhash(chunk, 0);
        let before = estimator64.registers().to_vec();
        estimator64.insert_hash(hash);
        estimator32.insert_hash((hash >> 32) as u32);

        assert!(before
            .iter()
            .zip(estimator64.registers())
            .all(|(old, new)| old <= new));
        assert!(estimator64.estimate() > 0);
        assert!(estimator32.estimate() > 0);
        assert!(estimator64.size_of() > 0);
    }

    for kind in KINDS {
        estimator64.estimate_with(kind);
        estimator32.estimate_with(kind);
    }
});
