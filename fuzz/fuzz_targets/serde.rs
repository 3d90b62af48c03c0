#![no_main]

use hyperloglog_estimators::HyperLogLog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = serde_json::from_slice::<HyperLogLog<u32>>(data) {
        estimator.insert_hash(1);
        estimator.estimate();
        assert_eq!(estimator.registers().len(), estimator.num_registers());

        let serialized = serde_json::to_vec(&estimator).unwrap();
        let restored: HyperLogLog<u32> = serde_json::from_slice(&serialized).unwrap();
        assert_eq!(estimator, restored);
    }
});
