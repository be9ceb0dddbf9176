//! # Reputation Passport Testkit
//!
//! Testing utilities for Reputation Passport.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with their canonical text and digest
//! - **Generators**: Proptest strategies for records and digests
//! - **Fixtures**: A memory-backed verifier/issuer pair and misbehaving ledgers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use passport_testkit::vectors::{all_vectors, record_from_vector};
//!
//! for vector in all_vectors() {
//!     let record = record_from_vector(&vector);
//!     let digest = passport_core::hash_record(&record).unwrap();
//!     assert_eq!(digest.to_string(), vector.digest);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use passport_testkit::generators::{credential_record, permute_record};
//!
//! proptest! {
//!     #[test]
//!     fn digest_ignores_key_order(record in credential_record(), seed: u64) {
//!         let permuted = permute_record(&record, seed);
//!         prop_assert_eq!(hash_record(&record).unwrap(), hash_record(&permuted).unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use passport_testkit::fixtures::{sample_record, TestFixture, OWNER};
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     fixture.record(&sample_record()).await;
//!     assert!(fixture.verifier.verify_one(OWNER, &sample_record()).await.unwrap());
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    hackathon_record, sample_record, too_deep_record, DelayedLedger, FailingLedger, TestFixture,
    ISSUER, OWNER,
};
pub use generators::{permute_keys, permute_record};
pub use vectors::{all_vectors, record_from_vector, verify_all_vectors, GoldenVector};
