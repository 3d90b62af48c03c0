//! # Serde module for HyperLogLog
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `HyperLogLog`. The sketch is converted into a tuple `(precision, kind, registers)`, where
//! `kind` is the `EstimatorKind` used by `estimate` and `registers` holds `2^precision` ranks.
//!
//! Deserialization rebuilds the sketch through `HyperLogLog::from_registers`, so a payload with
//! an unsupported precision, a wrong register count or an out of range rank is rejected instead
//! of producing a corrupted sketch.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::estimator::EstimatorKind;
use crate::hyperloglog::HyperLogLog;
use crate::width::HashWidth;

impl<V: HashWidth> Serialize for HyperLogLog<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.precision())?;
        tup.serialize_element(&self.kind())?;
        tup.serialize_element(self.registers())?;
        tup.end()
    }
}

impl<'de, V: HashWidth> Deserialize<'de> for HyperLogLog<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (precision, kind, registers): (u8, EstimatorKind, Vec<u8>) =
            Deserialize::deserialize(deserializer)?;
        HyperLogLog::from_registers(precision, kind, registers).map_err(D::Error::custom)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::estimator::tests::{hash32, hash64};
    use test_case::test_case;

    #[test_case(0; "empty set")]
    #[test_case(1; "single element")]
    #[test_case(2; "two distinct elements")]
    #[test_case(100; "hundred distinct elements")]
    #[test_case(10000; "ten thousand distinct elements")]
    fn test_serde(n: u64) {
        let mut original = HyperLogLog::<u64>::maximum_likelihood(10).unwrap();
        for i in 0..n {
            original.insert_hash(hash64(i));
        }

        let serialized = serde_json::to_string(&original).expect("serialization failed");
        assert!(
            !serialized.is_empty(),
            "serialized string should not be empty"
        );

        let deserialized: HyperLogLog<u64> =
            serde_json::from_str(&serialized).expect("deserialization failed");

        assert_eq!(original, deserialized);
        assert_eq!(original.estimate(), deserialized.estimate());
    }

    #[test]
    fn test_serde_format() {
        let mut hll = HyperLogLog::<u32>::classic(2).unwrap();
        hll.insert_hash(0x4000_0001);
        hll.insert_hash(hash32(3) | 0xc000_0000);
        let serialized = serde_json::to_string(&hll).unwrap();
        assert!(serialized.starts_with("[2,\"Classic\",[0,30,0,"), "{serialized}");
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let invalid_json = "{ invalid_json_string }";
        let result: Result<HyperLogLog<u64>, _> = serde_json::from_str(invalid_json);

        assert!(
            result.is_err(),
            "Deserialization should fail for invalid JSON"
        );
    }

    #[test_case("[2,\"Improved\",[0,0,0]]", "expected 4 registers, got 3"; "wrong register count")]
    #[test_case("[2,\"Improved\",[0,0,0,32]]", "register 3 has rank 32, maximum is 31"; "rank out of range")]
    #[test_case("[33,\"Classic\",[]]", "precision 33 exceeds hash width of 32 bits"; "precision out of range")]
    #[test_case("[2,\"Unknown\",[0,0,0,0]]", "unknown variant"; "unknown estimator")]
    fn test_failed_deserialization(input: &str, message: &str) {
        let result: Result<HyperLogLog<u32>, _> = serde_json::from_str(input);
        let err = result.unwrap_err().to_string();
        assert!(err.contains(message), "{err}");
    }

    #[test_case(&[91, 49, 55, 44, 13, 10, 91, 13, 93, 93]; "case 1")]
    #[test_case(&[91, 51, 44, 10, 110, 117, 108, 108, 93, 122]; "case 2")]
    fn test_failed_deserialization_bytes(input: &[u8]) {
        let result: Result<HyperLogLog<u64>, _> = serde_json::from_slice(input);
        assert!(result.is_err());
    }
}
