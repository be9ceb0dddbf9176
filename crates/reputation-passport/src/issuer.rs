//! Credential issuance: hash a record and write its digest to the ledger.

use std::sync::Arc;

use passport_core::{canonicalize_with_limit, fields, same_identity, CredentialRecord, Digest, DEFAULT_MAX_DEPTH};
use passport_ledger::{LedgerWriter, RecordReceipt};
use serde::{Deserialize, Serialize};

use crate::error::{PassportError, Result};

/// A credential whose digest is now on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    pub digest: Digest,
    pub owner: String,
    pub category: String,
    pub receipt: RecordReceipt,
}

/// Issues credentials on behalf of one issuer identity.
pub struct CredentialIssuer<W: LedgerWriter> {
    ledger: Arc<W>,
    issuer: String,
    max_depth: usize,
}

impl<W: LedgerWriter> CredentialIssuer<W> {
    pub fn new(ledger: Arc<W>, issuer: impl Into<String>) -> Self {
        Self {
            ledger,
            issuer: issuer.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Use a different canonicalization depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The identity this issuer records under.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ledger(&self) -> &W {
        &self.ledger
    }

    /// Record `record` on the ledger.
    ///
    /// The record must carry `userWallet`, `category`, and an `issuerWallet`
    /// naming this issuer. The issuer must be whitelisted.
    pub async fn issue(&self, record: &CredentialRecord) -> Result<IssuedCredential> {
        let owner = record
            .user_wallet()
            .ok_or(PassportError::MissingField(fields::USER_WALLET))?;
        let claimed = record
            .issuer_wallet()
            .ok_or(PassportError::MissingField(fields::ISSUER_WALLET))?;
        let category = record
            .category()
            .ok_or(PassportError::MissingField(fields::CATEGORY))?;

        if !same_identity(claimed, &self.issuer) {
            return Err(PassportError::IssuerMismatch {
                claimed: claimed.to_string(),
                issuer: self.issuer.clone(),
            });
        }

        let digest = Digest::of(&canonicalize_with_limit(record, self.max_depth)?);

        if !self.ledger.is_authorized_issuer(&self.issuer).await? {
            tracing::warn!(issuer = %self.issuer, "issuer is not whitelisted");
            return Err(PassportError::NotAuthorized(self.issuer.clone()));
        }

        let receipt = self
            .ledger
            .record_credential(&self.issuer, owner, &digest, category)
            .await
            .map_err(|e| {
                tracing::warn!(%digest, error = %e, "failed to record credential");
                e
            })?;

        tracing::info!(%digest, owner, category, "credential issued");

        Ok(IssuedCredential {
            digest,
            owner: owner.to_string(),
            category: category.to_string(),
            receipt,
        })
    }
}
