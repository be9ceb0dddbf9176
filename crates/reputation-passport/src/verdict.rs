//! Verification outcomes.

use passport_core::CredentialRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detailed outcome of checking one record against the ledger.
///
/// Only [`Verdict::Verified`] counts as verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Recorded, and both the issuer and the owner match.
    Verified,
    /// The digest is not on the ledger.
    NotRecorded,
    /// Recorded by a different issuer than the record claims.
    IssuerMismatch,
    /// The record belongs to someone other than the expected owner.
    OwnerMismatch,
    /// The record could not be canonicalized.
    Unencodable,
    /// The ledger could not answer (unavailable, misconfigured, timed out).
    Indeterminate,
}

impl Verdict {
    pub fn is_verified(self) -> bool {
        matches!(self, Verdict::Verified)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Verified => "verified",
            Verdict::NotRecorded => "not recorded",
            Verdict::IssuerMismatch => "issuer mismatch",
            Verdict::OwnerMismatch => "owner mismatch",
            Verdict::Unencodable => "unencodable",
            Verdict::Indeterminate => "indeterminate",
        };
        f.write_str(text)
    }
}

/// One entry of a batch verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub record: CredentialRecord,
    pub verified: bool,
    pub verdict: Verdict,
}

impl VerificationResult {
    pub fn new(record: CredentialRecord, verdict: Verdict) -> Self {
        Self {
            record,
            verified: verdict.is_verified(),
            verdict,
        }
    }
}
