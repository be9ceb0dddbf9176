//! # Reputation Passport
//!
//! Canonical-hash credential verification. A credential record is encoded
//! canonically, hashed with SHA-256, and checked against a ledger that maps
//! digests to the issuer that recorded them.
//!
//! ## Overview
//!
//! - **Canonicalization**: sorted-key compact JSON, independent of key order
//! - **Verification**: digest recorded, issuer matches, owner matches
//! - **Issuance**: whitelisted issuers record new digests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use reputation_passport::{CredentialRecord, Verifier, VerifierConfig};
//! use reputation_passport::ledger::MemoryLedger;
//!
//! async fn example() {
//!     let ledger = Arc::new(MemoryLedger::new());
//!     let verifier = Verifier::new(ledger, VerifierConfig::default());
//!
//!     let record = CredentialRecord::from_json_str(
//!         r#"{"userWallet":"0xOWNER","issuerWallet":"0xISSUER","category":"cert"}"#,
//!     )
//!     .unwrap();
//!
//!     let verified = verifier.verify_one("0xOWNER", &record).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `reputation_passport::core` - Records, canonical encoding, digests
//! - `reputation_passport::ledger` - Ledger traits and the in-memory ledger
//! - `reputation_passport::evm` - Ledger over the deployed contract

pub mod config;
pub mod error;
pub mod issuer;
pub mod verdict;
pub mod verifier;

// Re-export component crates
pub use passport_core as core;
pub use passport_ledger as ledger;
pub use passport_ledger_evm as evm;

// Re-export main types for convenience
pub use config::VerifierConfig;
pub use error::{PassportError, Result};
pub use issuer::{CredentialIssuer, IssuedCredential};
pub use verdict::{VerificationResult, Verdict};
pub use verifier::Verifier;

// Re-export commonly used core types
pub use passport_core::{
    canonicalize, hash_record, CanonicalBytes, Credential, CredentialRecord, Digest,
    EncodingError,
};
pub use passport_ledger::{Ledger, LedgerEntry, LedgerError, LedgerWriter};
