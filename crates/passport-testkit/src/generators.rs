//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use passport_core::{CredentialRecord, Digest, MAX_SAFE_INTEGER};

/// Generate a random Digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a 20-byte wallet address in mixed case.
pub fn wallet() -> impl Strategy<Value = String> {
    "0x[0-9a-fA-F]{40}".prop_map(String::from)
}

/// Generate an object key, including non-ASCII ones.
pub fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z0-9_]{0,11}",
        "[α-ωÀ-ÿ]{1,4}",
    ]
}

/// Generate a float with a canonical textual form.
pub fn canonical_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64 / 64.0),
        (1e-6f64..1e20),
    ]
}

/// Generate an integer every client represents exactly.
pub fn safe_integer() -> impl Strategy<Value = i64> {
    let bound = MAX_SAFE_INTEGER as i64;
    -bound..=bound
}

/// Generate a scalar JSON value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        safe_integer().prop_map(Value::from),
        canonical_float().prop_map(Value::from),
        ".{0,16}".prop_map(Value::String),
    ]
}

/// Generate an arbitrary JSON value with bounded nesting.
pub fn json_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

/// Generate a free-form credential record.
pub fn record() -> impl Strategy<Value = CredentialRecord> {
    prop::collection::vec((key(), json_value()), 0..8)
        .prop_map(|pairs| CredentialRecord::from_map(pairs.into_iter().collect()))
}

/// Generate a record carrying owner, issuer, and category claims.
pub fn credential_record() -> impl Strategy<Value = CredentialRecord> {
    (wallet(), wallet(), "[a-z]{3,12}", json_value()).prop_map(|(owner, issuer, category, data)| {
        CredentialRecord::new()
            .with("userWallet", owner)
            .with("issuerWallet", issuer)
            .with("category", category)
            .with("data", data)
    })
}

/// Rebuild a value with every object's keys inserted in a different order.
///
/// `seed` picks the rotation applied at each level.
pub fn permute_keys(value: &Value, seed: u64) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| permute_keys(item, mix(seed, i as u64)))
                .collect(),
        ),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.reverse();
            if !entries.is_empty() {
                let shift = (seed % entries.len() as u64) as usize;
                entries.rotate_left(shift);
            }
            let permuted: Map<String, Value> = entries
                .into_iter()
                .enumerate()
                .map(|(i, (k, v))| (k.clone(), permute_keys(v, mix(seed, i as u64))))
                .collect();
            Value::Object(permuted)
        }
        scalar => scalar.clone(),
    }
}

/// Permute the keys of a whole record.
pub fn permute_record(record: &CredentialRecord, seed: u64) -> CredentialRecord {
    let permuted = permute_keys(&Value::Object(record.as_map().clone()), seed);
    CredentialRecord::from_value(permuted).unwrap_or_else(|_| record.clone())
}

fn mix(seed: u64, salt: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(salt.wrapping_mul(1442695040888963407))
        .rotate_left(17)
}
