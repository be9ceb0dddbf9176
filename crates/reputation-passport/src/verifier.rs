//! The Verifier: recompute a credential digest and check it against the ledger.
//!
//! Verification answers a yes/no question. Ledger trouble (unreachable node,
//! missing configuration, slow queries) is never an error here: it yields an
//! unverified result and a `warn` event. Only a record that cannot be
//! canonicalized is reported back, since no lookup is possible for it.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use passport_core::{canonicalize_with_limit, claim_matches, CredentialRecord, Digest, EncodingError};
use passport_ledger::{Ledger, LedgerError};

use crate::config::VerifierConfig;
use crate::verdict::{VerificationResult, Verdict};

/// Verifies credential records against a shared ledger handle.
pub struct Verifier<L: Ledger> {
    /// The ledger, shared read-only.
    ledger: Arc<L>,
    /// Configuration.
    config: VerifierConfig,
}

impl<L: Ledger> Verifier<L> {
    /// Create a verifier over an existing ledger handle.
    pub fn new(ledger: Arc<L>, config: VerifierConfig) -> Self {
        Self { ledger, config }
    }

    /// Take ownership of a ledger, with default configuration.
    pub fn with_ledger(ledger: L) -> Self {
        Self::new(Arc::new(ledger), VerifierConfig::default())
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Digest of a record under this verifier's depth limit.
    pub fn hash(&self, record: &CredentialRecord) -> Result<Digest, EncodingError> {
        let canonical = canonicalize_with_limit(record, self.config.max_depth)?;
        Ok(Digest::of(&canonical))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify that `record` is on the ledger, was recorded by the issuer it
    /// names, and belongs to `owner`.
    pub async fn verify_one(
        &self,
        owner: &str,
        record: &CredentialRecord,
    ) -> Result<bool, EncodingError> {
        Ok(self.assess(owner, record).await?.is_verified())
    }

    /// Like [`verify_one`](Self::verify_one), reporting why a record failed.
    pub async fn assess(
        &self,
        owner: &str,
        record: &CredentialRecord,
    ) -> Result<Verdict, EncodingError> {
        let digest = self.hash(record)?;
        let verdict = self.assess_digest(owner, record, &digest).await;
        tracing::debug!(%digest, %verdict, "assessed credential");
        Ok(verdict)
    }

    /// Verify a batch of records for one owner.
    ///
    /// Records are checked concurrently, at most `max_in_flight` at a time.
    /// Output order matches input order. A record that fails for any reason,
    /// including encoding, is only marked unverified.
    pub async fn verify_many<I>(&self, owner: &str, records: I) -> Vec<VerificationResult>
    where
        I: IntoIterator<Item = CredentialRecord>,
    {
        stream::iter(records)
            .map(|record| async move {
                let verdict = match self.assess(owner, &record).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        tracing::debug!(error = %e, "credential record could not be encoded");
                        Verdict::Unencodable
                    }
                };
                VerificationResult::new(record, verdict)
            })
            .buffered(self.config.max_in_flight.max(1))
            .collect()
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a digest is recorded. Ledger failures read as `false`.
    pub async fn digest_exists(&self, digest: &Digest) -> bool {
        match self.query(self.ledger.entry_exists(digest)).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(%digest, error = %e, "ledger existence check failed");
                false
            }
        }
    }

    /// Digests recorded for `owner`. Ledger failures read as an empty list.
    pub async fn recorded_credentials(&self, owner: &str) -> Vec<Digest> {
        match self.query(self.ledger.credentials_of(owner)).await {
            Ok(digests) => digests,
            Err(e) => {
                tracing::warn!(owner, error = %e, "failed to list owner credentials");
                Vec::new()
            }
        }
    }

    async fn assess_digest(&self, owner: &str, record: &CredentialRecord, digest: &Digest) -> Verdict {
        match self.query(self.ledger.entry_exists(digest)).await {
            Ok(true) => {}
            Ok(false) => return Verdict::NotRecorded,
            Err(e) => {
                tracing::warn!(%digest, error = %e, "ledger existence check failed");
                return Verdict::Indeterminate;
            }
        }

        let entry = match self.query(self.ledger.get_entry(digest)).await {
            Ok(entry) => entry,
            Err(LedgerError::NotFound(_)) => return Verdict::NotRecorded,
            Err(e) => {
                tracing::warn!(%digest, error = %e, "ledger entry lookup failed");
                return Verdict::Indeterminate;
            }
        };

        if !claim_matches(record.issuer_wallet(), &entry.issuer) {
            return Verdict::IssuerMismatch;
        }
        if !claim_matches(record.user_wallet(), owner) {
            return Verdict::OwnerMismatch;
        }
        Verdict::Verified
    }

    /// Run a ledger query under the configured deadline.
    async fn query<T, F>(&self, fut: F) -> passport_ledger::Result<T>
    where
        F: Future<Output = passport_ledger::Result<T>>,
    {
        match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| LedgerError::Timeout(limit))?,
            None => fut.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_core::hash_record;
    use passport_ledger::{LedgerWriter, MemoryLedger};
    use serde_json::json;

    fn record() -> CredentialRecord {
        CredentialRecord::from_value(json!({
            "userWallet": "0xOWNER",
            "issuerWallet": "0xISSUER",
            "category": "cert"
        }))
        .unwrap()
    }

    async fn ledger_with(record: &CredentialRecord) -> MemoryLedger {
        let ledger = MemoryLedger::new().with_issuer("0xISSUER");
        let digest = hash_record(record).unwrap();
        ledger
            .record_credential("0xISSUER", "0xOWNER", &digest, "cert")
            .await
            .unwrap();
        ledger
    }

    #[tokio::test]
    async fn test_hash_matches_core() {
        let verifier = Verifier::with_ledger(MemoryLedger::new());
        assert_eq!(verifier.hash(&record()).unwrap(), hash_record(&record()).unwrap());
    }

    #[tokio::test]
    async fn test_verdicts() {
        let r = record();
        let verifier = Verifier::with_ledger(ledger_with(&r).await);

        assert_eq!(verifier.assess("0xOWNER", &r).await.unwrap(), Verdict::Verified);
        assert_eq!(verifier.assess("0xSOMEONE", &r).await.unwrap(), Verdict::OwnerMismatch);

        let unknown = r.clone().with("category", "other");
        assert_eq!(verifier.assess("0xOWNER", &unknown).await.unwrap(), Verdict::NotRecorded);
    }

    #[tokio::test]
    async fn test_issuer_checked_against_ledger_entry() {
        // The digest is recorded by 0xREAL, but the record claims 0xISSUER.
        let r = record();
        let ledger = MemoryLedger::new().with_issuer("0xREAL");
        ledger
            .record_credential("0xREAL", "0xOWNER", &hash_record(&r).unwrap(), "cert")
            .await
            .unwrap();

        let verifier = Verifier::with_ledger(ledger);
        assert_eq!(verifier.assess("0xOWNER", &r).await.unwrap(), Verdict::IssuerMismatch);
    }

    #[tokio::test]
    async fn test_depth_limit_from_config() {
        let verifier = Verifier::new(
            Arc::new(MemoryLedger::new()),
            VerifierConfig {
                max_depth: 2,
                ..VerifierConfig::default()
            },
        );
        let deep = CredentialRecord::new().with("a", json!({"b": {"c": 1}}));
        assert!(matches!(
            verifier.verify_one("0xOWNER", &deep).await,
            Err(EncodingError::DepthExceeded { limit: 2 })
        ));
    }

    #[tokio::test]
    async fn test_recorded_credentials() {
        let r = record();
        let verifier = Verifier::with_ledger(ledger_with(&r).await);
        assert_eq!(
            verifier.recorded_credentials("0xowner").await,
            vec![hash_record(&r).unwrap()]
        );
        assert!(verifier.digest_exists(&hash_record(&r).unwrap()).await);
    }

    #[test]
    fn test_oversized_depth_limit_is_capped() {
        let verifier = Verifier::new(
            Arc::new(MemoryLedger::new()),
            VerifierConfig {
                max_depth: usize::MAX,
                ..VerifierConfig::default()
            },
        );

        let mut nested = json!(1);
        for _ in 0..passport_core::MAX_DEPTH_CEILING {
            nested = json!([nested]);
        }
        let record = record().with("data", nested);
        assert_eq!(
            verifier.hash(&record).unwrap_err(),
            EncodingError::DepthExceeded {
                limit: passport_core::MAX_DEPTH_CEILING
            }
        );
    }
}
