//! End-to-end verification behavior against in-memory and misbehaving ledgers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use passport_testkit::generators::{credential_record, permute_record, record as any_record};
use passport_testkit::{
    hackathon_record, sample_record, too_deep_record, DelayedLedger, FailingLedger, TestFixture,
    ISSUER, OWNER,
};
use proptest::prelude::*;
use reputation_passport::ledger::{LedgerWriter, MemoryLedger};
use reputation_passport::{hash_record, CredentialRecord, Verdict, Verifier, VerifierConfig};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Digest properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn digest_ignores_key_order_at_every_depth(record in any_record(), seed: u64) {
        let permuted = permute_record(&record, seed);
        prop_assert_eq!(hash_record(&record).unwrap(), hash_record(&permuted).unwrap());
    }

    #[test]
    fn hashing_is_idempotent(record in credential_record()) {
        prop_assert_eq!(hash_record(&record).unwrap(), hash_record(&record).unwrap());
    }

    #[test]
    fn changing_category_changes_digest(record in credential_record(), suffix in "[a-z]{1,4}") {
        let category = format!("{}{}", record.category().unwrap(), suffix);
        let changed = record.clone().with("category", category);
        prop_assert_ne!(hash_record(&record).unwrap(), hash_record(&changed).unwrap());
    }
}

#[test]
fn test_nested_scalar_changes_change_digest() {
    let base = hackathon_record(OWNER, ISSUER);
    let digest = hash_record(&base).unwrap();

    let variants = [
        json!({"title": "Finalist", "rank": 1, "score": 97.5, "tags": ["rust", "web3"]}),
        json!({"title": "Winner", "rank": 2, "score": 97.5, "tags": ["rust", "web3"]}),
        json!({"title": "Winner", "rank": 1, "score": 97.25, "tags": ["rust", "web3"]}),
        json!({"title": "Winner", "rank": 1, "score": 97.5, "tags": ["rust", "web2"]}),
        json!({"title": "Winner", "rank": 1, "score": 97.5, "tags": ["rust", "web3"], "extra": null}),
    ];
    for data in variants {
        let changed = base.clone().with("data", data);
        assert_ne!(hash_record(&changed).unwrap(), digest);
    }
}

#[test]
fn test_sequence_order_is_significant() {
    let a = sample_record().with("tags", json!(["a", "b"]));
    let b = sample_record().with("tags", json!(["b", "a"]));
    assert_ne!(hash_record(&a).unwrap(), hash_record(&b).unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Single-record verification
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_positive_verification() {
    init_tracing();
    let fixture = TestFixture::new();
    let record = sample_record();
    fixture.record(&record).await;

    assert!(fixture.verifier.verify_one(OWNER, &record).await.unwrap());
}

#[tokio::test]
async fn test_not_recorded() {
    let fixture = TestFixture::new();
    let record = sample_record();

    assert!(!fixture.verifier.verify_one(OWNER, &record).await.unwrap());
    assert_eq!(
        fixture.verifier.assess(OWNER, &record).await.unwrap(),
        Verdict::NotRecorded
    );
}

#[tokio::test]
async fn test_issuer_differs_from_ledger() {
    let fixture = TestFixture::new();
    // Recorded by ISSUER, but the record claims someone else issued it.
    let record = sample_record().with("issuerWallet", "0xIMPOSTOR");
    fixture.record(&record).await;

    assert!(!fixture.verifier.verify_one(OWNER, &record).await.unwrap());
    assert_eq!(
        fixture.verifier.assess(OWNER, &record).await.unwrap(),
        Verdict::IssuerMismatch
    );
}

#[tokio::test]
async fn test_owner_differs() {
    let fixture = TestFixture::new();
    let record = sample_record();
    fixture.record(&record).await;

    assert!(!fixture.verifier.verify_one("0xSOMEONE_ELSE", &record).await.unwrap());
    assert_eq!(
        fixture.verifier.assess("0xSOMEONE_ELSE", &record).await.unwrap(),
        Verdict::OwnerMismatch
    );
}

#[tokio::test]
async fn test_missing_owner_claim_never_matches() {
    let fixture = TestFixture::new();
    let record = CredentialRecord::new()
        .with("issuerWallet", ISSUER)
        .with("category", "cert");
    fixture.record(&record).await;

    assert!(!fixture.verifier.verify_one(OWNER, &record).await.unwrap());
}

#[tokio::test]
async fn test_identity_comparison_ignores_case() {
    let fixture = TestFixture::new();
    let record = CredentialRecord::new()
        .with("userWallet", "0xowner")
        .with("issuerWallet", "0xIsSuEr")
        .with("category", "cert");
    fixture.record(&record).await;

    assert!(fixture.verifier.verify_one("0xOWNER", &record).await.unwrap());
    assert!(fixture.verifier.verify_one("0xOwNeR", &record).await.unwrap());
}

#[tokio::test]
async fn test_encoding_error_is_surfaced() {
    let fixture = TestFixture::new();
    assert!(fixture
        .verifier
        .verify_one(OWNER, &too_deep_record())
        .await
        .is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger failures
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failing_ledger_yields_false() {
    init_tracing();
    let ledger = Arc::new(FailingLedger::unavailable());
    let verifier = Verifier::new(ledger.clone(), VerifierConfig::default());

    assert!(!verifier.verify_one(OWNER, &sample_record()).await.unwrap());
    assert_eq!(
        verifier.assess(OWNER, &sample_record()).await.unwrap(),
        Verdict::Indeterminate
    );
    assert!(ledger.calls() >= 2);
}

#[tokio::test]
async fn test_unconfigured_ledger_yields_false() {
    let verifier = Verifier::with_ledger(FailingLedger::not_configured());
    let digest = hash_record(&sample_record()).unwrap();

    assert!(!verifier.verify_one(OWNER, &sample_record()).await.unwrap());
    assert!(!verifier.digest_exists(&digest).await);
    assert!(verifier.recorded_credentials(OWNER).await.is_empty());
}

#[tokio::test]
async fn test_slow_ledger_times_out() {
    let record = sample_record();
    let ledger = MemoryLedger::new().with_issuer(ISSUER);
    ledger
        .record_credential(ISSUER, OWNER, &hash_record(&record).unwrap(), "cert")
        .await
        .unwrap();

    let slow = DelayedLedger::new(ledger, Duration::from_millis(500));
    let verifier = Verifier::new(
        Arc::new(slow),
        VerifierConfig {
            query_timeout: Some(Duration::from_millis(20)),
            ..VerifierConfig::default()
        },
    );

    let started = Instant::now();
    assert_eq!(
        verifier.assess(OWNER, &record).await.unwrap(),
        Verdict::Indeterminate
    );
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_no_timeout_waits_for_slow_ledger() {
    let record = sample_record();
    let ledger = MemoryLedger::new().with_issuer(ISSUER);
    ledger
        .record_credential(ISSUER, OWNER, &hash_record(&record).unwrap(), "cert")
        .await
        .unwrap();

    let verifier = Verifier::new(
        Arc::new(DelayedLedger::new(ledger, Duration::from_millis(30))),
        VerifierConfig {
            query_timeout: None,
            ..VerifierConfig::default()
        },
    );

    assert!(verifier.verify_one(OWNER, &record).await.unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch verification
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_isolates_unencodable_record() {
    let fixture = TestFixture::new();
    let first = sample_record();
    let third = hackathon_record(OWNER, ISSUER);
    fixture.record(&first).await;
    fixture.record(&third).await;

    let results = fixture
        .verifier
        .verify_many(OWNER, vec![first.clone(), too_deep_record(), third.clone()])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].record, first);
    assert!(results[0].verified);
    assert!(!results[1].verified);
    assert_eq!(results[1].verdict, Verdict::Unencodable);
    assert_eq!(results[2].record, third);
    assert!(results[2].verified);
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let records: Vec<CredentialRecord> = (0..6)
        .map(|i| sample_record().with("serial", i))
        .collect();

    let ledger = MemoryLedger::new().with_issuer(ISSUER);
    for record in records.iter().step_by(2) {
        ledger
            .record_credential(ISSUER, OWNER, &hash_record(record).unwrap(), "cert")
            .await
            .unwrap();
    }

    // Earlier records finish last.
    let mut delayed = DelayedLedger::new(ledger, Duration::ZERO);
    for (i, record) in records.iter().enumerate() {
        let delay = Duration::from_millis(10 * (records.len() - i) as u64);
        delayed = delayed.with_delay(hash_record(record).unwrap(), delay);
    }

    let verifier = Verifier::with_ledger(delayed);
    let results = verifier.verify_many(OWNER, records.clone()).await;

    let returned: Vec<_> = results.iter().map(|r| r.record.clone()).collect();
    assert_eq!(returned, records);
    let flags: Vec<bool> = results.iter().map(|r| r.verified).collect();
    assert_eq!(flags, vec![true, false, true, false, true, false]);
}

#[tokio::test]
async fn test_batch_runs_concurrently() {
    let ledger = MemoryLedger::new();
    let verifier = Verifier::new(
        Arc::new(DelayedLedger::new(ledger, Duration::from_millis(100))),
        VerifierConfig {
            max_in_flight: 8,
            ..VerifierConfig::default()
        },
    );
    let records: Vec<_> = (0..8).map(|i| sample_record().with("serial", i)).collect();

    let started = Instant::now();
    let results = verifier.verify_many(OWNER, records).await;
    assert_eq!(results.len(), 8);
    assert!(started.elapsed() < Duration::from_millis(800));
}

#[tokio::test]
async fn test_batch_against_failing_ledger() {
    let verifier = Verifier::with_ledger(FailingLedger::unavailable());
    let results = verifier
        .verify_many(OWNER, vec![sample_record(), hackathon_record(OWNER, ISSUER)])
        .await;

    assert!(results.iter().all(|r| !r.verified));
    assert!(results.iter().all(|r| r.verdict == Verdict::Indeterminate));
}

#[tokio::test]
async fn test_empty_batch() {
    let fixture = TestFixture::new();
    let results = fixture.verifier.verify_many(OWNER, Vec::new()).await;
    assert!(results.is_empty());
}
