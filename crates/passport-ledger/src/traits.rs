//! Ledger traits: the narrow interface to the credential system of record.
//!
//! The verifier only reads. Issuance goes through [`LedgerWriter`], which
//! implementations backed by a signer provide.

use async_trait::async_trait;
use passport_core::Digest;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A digest as recorded on the ledger. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The recorded credential digest.
    pub digest: Digest,
    /// The issuer identity that recorded it.
    pub issuer: String,
    /// Free-form category label.
    pub category: String,
    /// When it was recorded (Unix seconds).
    pub timestamp: u64,
}

/// Confirmation of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReceipt {
    /// The digest that was recorded.
    pub digest: Digest,
    /// Transaction hash, for ledgers that have one.
    pub transaction: Option<String>,
    /// Block the write landed in, if known.
    pub block_number: Option<u64>,
}

/// Read access to the credential ledger.
///
/// Identities are passed as strings; implementations compare them
/// case-insensitively.
#[async_trait]
pub trait Ledger: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Entry Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether a digest has been recorded.
    async fn entry_exists(&self, digest: &Digest) -> Result<bool>;

    /// Fetch the entry for a digest.
    ///
    /// Returns `LedgerError::NotFound` when nothing is recorded.
    async fn get_entry(&self, digest: &Digest) -> Result<LedgerEntry>;

    // ─────────────────────────────────────────────────────────────────────────
    // Issuers
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether an identity may record credentials.
    async fn is_authorized_issuer(&self, issuer: &str) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Owner Index
    // ─────────────────────────────────────────────────────────────────────────

    /// Digests recorded for an owner, in issuance order.
    async fn credentials_of(&self, owner: &str) -> Result<Vec<Digest>>;

    /// Number of credentials recorded for an owner.
    async fn credential_count(&self, owner: &str) -> Result<u64> {
        Ok(self.credentials_of(owner).await?.len() as u64)
    }
}

/// Write access to the credential ledger.
#[async_trait]
pub trait LedgerWriter: Ledger {
    /// Record a digest for `owner` on behalf of `issuer`.
    ///
    /// Fails with `UnauthorizedIssuer` if the issuer is not whitelisted and
    /// `AlreadyRecorded` if the digest exists.
    async fn record_credential(
        &self,
        issuer: &str,
        owner: &str,
        digest: &Digest,
        category: &str,
    ) -> Result<RecordReceipt>;
}
