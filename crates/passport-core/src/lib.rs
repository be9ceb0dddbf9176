//! # Reputation Passport Core
//!
//! Pure primitives for Reputation Passport: credential records, canonical
//! encoding, and SHA-256 digests.
//!
//! This crate contains no I/O and no ledger access. It is pure computation
//! over credential data.
//!
//! ## Key Types
//!
//! - [`CredentialRecord`] - Schemaless JSON object describing a claim
//! - [`CanonicalBytes`] - Deterministic encoding of a record
//! - [`Digest`] - SHA-256 of the canonical bytes, the value stored on the ledger
//!
//! ## Canonicalization
//!
//! Records are encoded as sorted-key compact JSON. See [`canonical`] module.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod record;

pub use canonical::{
    canonicalize, canonicalize_with_limit, CanonicalBytes, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING,
    MAX_SAFE_INTEGER,
};
pub use digest::{hash_record, Digest, DIGEST_PREFIX};
pub use error::{CoreError, EncodingError};
pub use identity::{claim_matches, same_identity, WalletAddress};
pub use record::{fields, Credential, CredentialRecord};
