//! Error types for Reputation Passport core.

use thiserror::Error;

/// Errors raised while turning a credential record into canonical bytes.
///
/// Encoding failures are programmer errors: the record itself cannot be
/// hashed, so no ledger lookup is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("number {0} has no canonical representation")]
    NonCanonicalNumber(String),

    #[error("credential record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("malformed credential JSON: {0}")]
    MalformedJson(String),
}

/// Core errors outside of canonical encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
