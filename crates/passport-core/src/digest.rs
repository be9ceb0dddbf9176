//! SHA-256 credential digests.
//!
//! A [`Digest`] is what the ledger stores. Its text form is `0x` followed by 64
//! lowercase hex characters, matching a Solidity `bytes32` as rendered by
//! ethers clients.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::canonical::{canonicalize, CanonicalBytes};
use crate::error::{CoreError, EncodingError};
use crate::record::CredentialRecord;

/// Prefix on the textual form of a digest.
pub const DIGEST_PREFIX: &str = "0x";

/// A 32-byte SHA-256 digest of canonical credential bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Hash canonical bytes.
    pub fn of(canonical: &CanonicalBytes) -> Self {
        Self(Sha256::digest(canonical.as_bytes()).into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse `0x` + 64 hex characters, either case.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let body = s
            .strip_prefix(DIGEST_PREFIX)
            .ok_or_else(|| CoreError::InvalidDigest(format!("missing {DIGEST_PREFIX} prefix: {s}")))?;
        if body.len() != 64 {
            return Err(CoreError::InvalidDigest(format!(
                "expected 64 hex characters, got {}",
                body.len()
            )));
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(body, &mut arr)
            .map_err(|e| CoreError::InvalidDigest(format!("{e}: {s}")))?;
        Ok(Self(arr))
    }
}

/// Canonicalize and hash a record.
///
/// Deterministic and synchronous; the same record always yields the same digest
/// regardless of key insertion order.
pub fn hash_record(record: &CredentialRecord) -> Result<Digest, EncodingError> {
    let canonical = canonicalize(record)?;
    Ok(Digest::of(&canonical))
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIGEST_PREFIX}{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}...)", &self.to_hex()[..16])
    }
}

impl FromStr for Digest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
