//! Error types for Reputation Passport.

use passport_core::EncodingError;
use passport_ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur on the issuance path.
///
/// Verification never returns these: it absorbs ledger failures into an
/// unverified verdict.
#[derive(Debug, Error)]
pub enum PassportError {
    /// The record cannot be canonicalized.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A required record field is missing or not a string.
    #[error("credential record is missing string field `{0}`")]
    MissingField(&'static str),

    /// The record names a different issuer than the one issuing it.
    #[error("record names issuer {claimed}, but it is being issued by {issuer}")]
    IssuerMismatch { claimed: String, issuer: String },

    /// Not authorized.
    #[error("not authorized: {0} is not a whitelisted issuer")]
    NotAuthorized(String),
}

/// Result type for Reputation Passport operations.
pub type Result<T> = std::result::Result<T, PassportError>;
