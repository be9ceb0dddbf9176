//! In-memory implementation of the Ledger traits.
//!
//! Same rules as the deployed contract (issuer whitelist, one entry per
//! digest, per-owner index in issuance order) with no persistence. Used for
//! tests and local runs.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use passport_core::Digest;

use crate::error::{LedgerError, Result};
use crate::traits::{Ledger, LedgerEntry, LedgerWriter, RecordReceipt};

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    /// Entries indexed by digest.
    entries: HashMap<Digest, LedgerEntry>,

    /// Owner (lowercased) -> digests in issuance order.
    by_owner: HashMap<String, Vec<Digest>>,

    /// Whitelisted issuers (lowercased).
    issuers: HashSet<String>,
}

impl MemoryLedger {
    /// Create a new empty ledger with no issuers.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner::default()),
        }
    }

    /// Builder-style issuer whitelisting.
    pub fn with_issuer(self, issuer: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.issuers.insert(normalize(issuer));
        }
        self
    }

    /// Add an identity to the issuer whitelist.
    pub fn authorize_issuer(&self, issuer: &str) -> Result<()> {
        self.write()?.issuers.insert(normalize(issuer));
        Ok(())
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryLedgerInner>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Unavailable("memory ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryLedgerInner>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Unavailable("memory ledger lock poisoned".into()))
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn entry_exists(&self, digest: &Digest) -> Result<bool> {
        Ok(self.read()?.entries.contains_key(digest))
    }

    async fn get_entry(&self, digest: &Digest) -> Result<LedgerEntry> {
        self.read()?
            .entries
            .get(digest)
            .cloned()
            .ok_or(LedgerError::NotFound(*digest))
    }

    async fn is_authorized_issuer(&self, issuer: &str) -> Result<bool> {
        Ok(self.read()?.issuers.contains(&normalize(issuer)))
    }

    async fn credentials_of(&self, owner: &str) -> Result<Vec<Digest>> {
        Ok(self
            .read()?
            .by_owner
            .get(&normalize(owner))
            .cloned()
            .unwrap_or_default())
    }

    async fn credential_count(&self, owner: &str) -> Result<u64> {
        Ok(self
            .read()?
            .by_owner
            .get(&normalize(owner))
            .map_or(0, |digests| digests.len() as u64))
    }
}

#[async_trait]
impl LedgerWriter for MemoryLedger {
    async fn record_credential(
        &self,
        issuer: &str,
        owner: &str,
        digest: &Digest,
        category: &str,
    ) -> Result<RecordReceipt> {
        if owner.trim().is_empty() {
            return Err(LedgerError::InvalidIdentity("empty owner".into()));
        }

        let mut inner = self.write()?;

        if !inner.issuers.contains(&normalize(issuer)) {
            return Err(LedgerError::UnauthorizedIssuer(issuer.to_string()));
        }
        if inner.entries.contains_key(digest) {
            return Err(LedgerError::AlreadyRecorded(*digest));
        }

        inner.entries.insert(
            *digest,
            LedgerEntry {
                digest: *digest,
                issuer: issuer.to_string(),
                category: category.to_string(),
                timestamp: now_secs(),
            },
        );
        inner
            .by_owner
            .entry(normalize(owner))
            .or_default()
            .push(*digest);

        tracing::debug!(%digest, issuer, owner, "recorded credential in memory ledger");

        Ok(RecordReceipt {
            digest: *digest,
            transaction: None,
            block_number: None,
        })
    }
}

fn normalize(identity: &str) -> String {
    identity.to_ascii_lowercase()
}

/// Current time in Unix seconds.
fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
