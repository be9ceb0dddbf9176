//! `passport issue`: record a credential's digest on the contract.
//!
//! The signing key is the issuer. The record's `issuerWallet` must name
//! the signer's address, and that address must be whitelisted.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use reputation_passport::evm::EvmLedger;
use reputation_passport::{CredentialIssuer, CredentialRecord, LedgerWriter};
use serde_json::json;

use crate::connection::LedgerArgs;
use crate::input::read_single_record;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Credential JSON file holding one record (`-` for standard input).
    pub file: PathBuf,

    /// Issuer private key, hex encoded.
    #[arg(long = "private-key", env = "PASSPORT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[command(flatten)]
    pub ledger: LedgerArgs,
}

pub async fn run_issue(args: &IssueArgs, out: &mut dyn Write) -> Result<u8> {
    let record = read_single_record(&args.file)?;
    let ledger = EvmLedger::connect_with_signer(&args.ledger.evm_config()?, &args.private_key)?;
    let identity = ledger.signer_identity();
    tracing::debug!(issuer = %identity, contract = %ledger.address(), "issuing credential");

    let issuer = CredentialIssuer::new(Arc::new(ledger), identity);
    issue_record(&issuer, &record, out).await
}

/// Issue `record` and print the resulting receipt as JSON.
pub async fn issue_record<W: LedgerWriter>(
    issuer: &CredentialIssuer<W>,
    record: &CredentialRecord,
    out: &mut dyn Write,
) -> Result<u8> {
    let issued = issuer.issue(record).await?;
    let summary = json!({
        "digest": issued.digest,
        "owner": issued.owner,
        "category": issued.category,
        "transaction": issued.receipt.transaction,
        "blockNumber": issued.receipt.block_number,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(0)
}
