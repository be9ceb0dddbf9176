//! Error types for the ledger module.

use std::time::Duration;

use passport_core::Digest;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger could not be reached (network, RPC, node failure).
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger handle is missing required configuration.
    #[error("ledger not configured: {0}")]
    NotConfigured(String),

    /// A query did not complete in time.
    #[error("ledger query timed out after {0:?}")]
    Timeout(Duration),

    /// No entry is recorded for this digest.
    #[error("no ledger entry for {0}")]
    NotFound(Digest),

    /// The caller is not on the issuer whitelist.
    #[error("{0} is not a whitelisted issuer")]
    UnauthorizedIssuer(String),

    /// The digest is already on the ledger.
    #[error("digest {0} is already recorded")]
    AlreadyRecorded(Digest),

    /// An identity could not be interpreted by this ledger.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// The ledger refused a write (reverted transaction, dropped receipt).
    #[error("ledger rejected the request: {0}")]
    Rejected(String),
}

impl LedgerError {
    /// Whether this error comes from the environment rather than ledger state.
    ///
    /// Environmental errors say nothing about the credential being checked.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::NotConfigured(_) | Self::Timeout(_)
        )
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
