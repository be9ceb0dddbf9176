//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: sample records, a memory-backed
//! fixture, and ledgers that misbehave on purpose.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use passport_core::{hash_record, CredentialRecord, Digest};
use passport_ledger::{Ledger, LedgerEntry, LedgerError, LedgerWriter, MemoryLedger, RecordReceipt};
use reputation_passport::{CredentialIssuer, Verifier, VerifierConfig};
use serde_json::json;

/// Owner wallet used by the sample records.
pub const OWNER: &str = "0xOWNER";

/// Issuer wallet used by the sample records.
pub const ISSUER: &str = "0xISSUER";

/// The minimal positive scenario: `{userWallet, issuerWallet, category}`.
pub fn sample_record() -> CredentialRecord {
    CredentialRecord::new()
        .with("userWallet", OWNER)
        .with("issuerWallet", ISSUER)
        .with("category", "cert")
}

/// A record shaped like the ones the passport front end issues.
pub fn hackathon_record(owner: &str, issuer: &str) -> CredentialRecord {
    CredentialRecord::new()
        .with("userWallet", owner)
        .with("issuerWallet", issuer)
        .with("category", "hackathon")
        .with(
            "data",
            json!({"title": "Winner", "rank": 1, "score": 97.5, "tags": ["rust", "web3"]}),
        )
        .with("issuedAt", "2024-03-15")
}

/// A record nested deeper than the default canonicalization limit.
pub fn too_deep_record() -> CredentialRecord {
    let mut value = json!("leaf");
    for _ in 0..passport_core::DEFAULT_MAX_DEPTH {
        value = json!({ "next": value });
    }
    CredentialRecord::new()
        .with("userWallet", OWNER)
        .with("issuerWallet", ISSUER)
        .with("nested", value)
}

/// A verifier and issuer sharing one in-memory ledger.
///
/// [`ISSUER`] is whitelisted.
pub struct TestFixture {
    pub ledger: Arc<MemoryLedger>,
    pub verifier: Verifier<MemoryLedger>,
    pub issuer: CredentialIssuer<MemoryLedger>,
}

impl TestFixture {
    /// Create a fixture with default verifier configuration.
    pub fn new() -> Self {
        Self::with_config(VerifierConfig::default())
    }

    pub fn with_config(config: VerifierConfig) -> Self {
        let ledger = Arc::new(MemoryLedger::new().with_issuer(ISSUER));
        Self {
            verifier: Verifier::new(ledger.clone(), config),
            issuer: CredentialIssuer::new(ledger.clone(), ISSUER),
            ledger,
        }
    }

    /// Record a record's digest on behalf of [`ISSUER`], bypassing the
    /// issuance checks.
    pub async fn record(&self, record: &CredentialRecord) -> Digest {
        let digest = hash_record(record).expect("fixture record must encode");
        let owner = record.user_wallet().unwrap_or(OWNER);
        self.ledger
            .record_credential(ISSUER, owner, &digest, "cert")
            .await
            .expect("fixture ledger write");
        digest
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A ledger that fails every call with the same error.
#[derive(Debug, Clone)]
pub struct FailingLedger {
    error: LedgerError,
    calls: Arc<AtomicUsize>,
}

impl FailingLedger {
    pub fn new(error: LedgerError) -> Self {
        Self {
            error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A ledger whose node cannot be reached.
    pub fn unavailable() -> Self {
        Self::new(LedgerError::Unavailable("connection refused".into()))
    }

    /// A ledger with no contract address configured.
    pub fn not_configured() -> Self {
        Self::new(LedgerError::NotConfigured("contract address not set".into()))
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> passport_ledger::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

#[async_trait]
impl Ledger for FailingLedger {
    async fn entry_exists(&self, _digest: &Digest) -> passport_ledger::Result<bool> {
        self.fail()
    }

    async fn get_entry(&self, _digest: &Digest) -> passport_ledger::Result<LedgerEntry> {
        self.fail()
    }

    async fn is_authorized_issuer(&self, _issuer: &str) -> passport_ledger::Result<bool> {
        self.fail()
    }

    async fn credentials_of(&self, _owner: &str) -> passport_ledger::Result<Vec<Digest>> {
        self.fail()
    }
}

#[async_trait]
impl LedgerWriter for FailingLedger {
    async fn record_credential(
        &self,
        _issuer: &str,
        _owner: &str,
        _digest: &Digest,
        _category: &str,
    ) -> passport_ledger::Result<RecordReceipt> {
        self.fail()
    }
}

/// Wraps a ledger and delays existence checks.
///
/// Individual digests can get their own delay, so batch tests can force
/// completion order to differ from input order.
pub struct DelayedLedger<L> {
    inner: L,
    default_delay: Duration,
    delays: HashMap<Digest, Duration>,
}

impl<L: Ledger> DelayedLedger<L> {
    pub fn new(inner: L, default_delay: Duration) -> Self {
        Self {
            inner,
            default_delay,
            delays: HashMap::new(),
        }
    }

    /// Use a specific delay for one digest.
    pub fn with_delay(mut self, digest: Digest, delay: Duration) -> Self {
        self.delays.insert(digest, delay);
        self
    }

    async fn pause(&self, digest: &Digest) {
        let delay = self.delays.get(digest).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl<L: Ledger> Ledger for DelayedLedger<L> {
    async fn entry_exists(&self, digest: &Digest) -> passport_ledger::Result<bool> {
        self.pause(digest).await;
        self.inner.entry_exists(digest).await
    }

    async fn get_entry(&self, digest: &Digest) -> passport_ledger::Result<LedgerEntry> {
        self.inner.get_entry(digest).await
    }

    async fn is_authorized_issuer(&self, issuer: &str) -> passport_ledger::Result<bool> {
        self.inner.is_authorized_issuer(issuer).await
    }

    async fn credentials_of(&self, owner: &str) -> passport_ledger::Result<Vec<Digest>> {
        self.inner.credentials_of(owner).await
    }
}
