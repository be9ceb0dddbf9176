//! `passport verify`: check credential files against the contract for one owner.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use reputation_passport::evm::EvmLedger;
use reputation_passport::{CredentialRecord, Ledger, Verifier};
use serde_json::json;

use crate::connection::LedgerArgs;
use crate::input::read_records;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Wallet the credentials must belong to.
    #[arg(long)]
    pub owner: String,

    /// Credential JSON files (`-` for standard input).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Emit one JSON array instead of text lines.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub ledger: LedgerArgs,
}

/// A record together with where it was read from.
pub struct SourcedRecord {
    pub source: String,
    pub record: CredentialRecord,
}

pub async fn run_verify(args: &VerifyArgs, out: &mut dyn Write) -> Result<u8> {
    let mut records = Vec::new();
    for file in &args.files {
        for (i, record) in read_records(file)?.into_iter().enumerate() {
            records.push(SourcedRecord {
                source: format!("{}#{i}", file.display()),
                record,
            });
        }
    }

    let ledger = EvmLedger::connect(&args.ledger.evm_config()?)?;
    if !ledger.is_supported_network().await {
        tracing::warn!(contract = %ledger.address(), "connected chain is not a supported passport network");
    }

    let verifier = Verifier::new(Arc::new(ledger), args.ledger.verifier_config());
    verify_records(&verifier, &args.owner, records, args.json, out).await
}

/// Verify `records` and report one line (or JSON object) per record.
///
/// Returns 0 when every record verified, 1 otherwise.
pub async fn verify_records<L: Ledger>(
    verifier: &Verifier<L>,
    owner: &str,
    records: Vec<SourcedRecord>,
    as_json: bool,
    out: &mut dyn Write,
) -> Result<u8> {
    let (sources, records): (Vec<_>, Vec<_>) =
        records.into_iter().map(|r| (r.source, r.record)).unzip();
    let results = verifier.verify_many(owner, records).await;

    let mut all_verified = true;
    let mut report = Vec::with_capacity(results.len());
    for (source, result) in sources.iter().zip(&results) {
        all_verified &= result.verified;
        let digest = verifier.hash(&result.record).ok();
        if as_json {
            report.push(json!({
                "source": source,
                "digest": digest.map(|d| d.to_string()),
                "verified": result.verified,
                "verdict": result.verdict,
            }));
        } else {
            let digest = digest.map_or_else(|| "-".to_string(), |d| d.to_string());
            writeln!(out, "{:<16} {digest} {source}", result.verdict.to_string())?;
        }
    }

    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    }
    Ok(if all_verified { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reputation_passport::hash_record;
    use reputation_passport::ledger::{LedgerWriter, MemoryLedger};
    use serde_json::Value;

    const OWNER: &str = "0x1111111111111111111111111111111111111111";
    const ISSUER: &str = "0x2222222222222222222222222222222222222222";

    fn sourced(name: &str, category: &str) -> SourcedRecord {
        SourcedRecord {
            source: name.to_string(),
            record: CredentialRecord::new()
                .with("userWallet", OWNER)
                .with("issuerWallet", ISSUER)
                .with("category", category),
        }
    }

    async fn verifier_with(records: &[&SourcedRecord]) -> Verifier<MemoryLedger> {
        let ledger = MemoryLedger::new().with_issuer(ISSUER);
        for r in records {
            let digest = hash_record(&r.record).unwrap();
            ledger
                .record_credential(ISSUER, OWNER, &digest, "cert")
                .await
                .unwrap();
        }
        Verifier::with_ledger(ledger)
    }

    #[tokio::test]
    async fn all_verified_exits_zero() {
        let a = sourced("a.json#0", "cert");
        let verifier = verifier_with(&[&a]).await;

        let mut out = Vec::new();
        let code = verify_records(&verifier, OWNER, vec![a], false, &mut out)
            .await
            .unwrap();
        assert_eq!(code, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("verified"));
        assert!(text.contains("a.json#0"));
    }

    #[tokio::test]
    async fn any_failure_exits_one() {
        let a = sourced("a.json#0", "cert");
        let b = sourced("b.json#0", "hackathon");
        let verifier = verifier_with(&[&a]).await;

        let mut out = Vec::new();
        let code = verify_records(&verifier, OWNER, vec![a, b], true, &mut out)
            .await
            .unwrap();
        assert_eq!(code, 1);

        let report: Value = serde_json::from_slice(&out).unwrap();
        let entries = report.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["verdict"], "verified");
        assert_eq!(entries[1]["source"], "b.json#0");
        assert_eq!(entries[1]["verdict"], "not_recorded");
        assert_eq!(entries[1]["verified"], false);
    }
}
