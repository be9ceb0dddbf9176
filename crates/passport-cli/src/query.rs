//! `passport exists` and `passport list`: read-only ledger queries.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use reputation_passport::evm::{EvmLedger, ReadOnlyLedger};
use reputation_passport::{Digest, Ledger, Verifier};

use crate::connection::LedgerArgs;

#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Credential digest, `0x` followed by 64 hex digits.
    pub digest: String,

    #[command(flatten)]
    pub ledger: LedgerArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Wallet whose credentials to list.
    #[arg(long)]
    pub owner: String,

    #[command(flatten)]
    pub ledger: LedgerArgs,
}

fn connect(args: &LedgerArgs) -> Result<Verifier<ReadOnlyLedger>> {
    let ledger = EvmLedger::connect(&args.evm_config()?)?;
    Ok(Verifier::new(Arc::new(ledger), args.verifier_config()))
}

pub async fn run_exists(args: &ExistsArgs, out: &mut dyn Write) -> Result<u8> {
    let digest: Digest = args
        .digest
        .parse()
        .with_context(|| format!("invalid digest {:?}", args.digest))?;
    let verifier = connect(&args.ledger)?;
    report_exists(&verifier, &digest, out).await
}

pub async fn run_list(args: &ListArgs, out: &mut dyn Write) -> Result<u8> {
    let verifier = connect(&args.ledger)?;
    list_credentials(&verifier, &args.owner, out).await
}

/// Print whether `digest` is recorded. Returns 0 if it is, 1 if not.
pub async fn report_exists<L: Ledger>(
    verifier: &Verifier<L>,
    digest: &Digest,
    out: &mut dyn Write,
) -> Result<u8> {
    if verifier.digest_exists(digest).await {
        writeln!(out, "{digest} recorded")?;
        Ok(0)
    } else {
        writeln!(out, "{digest} not recorded")?;
        Ok(1)
    }
}

/// Print every digest recorded for `owner`, oldest first.
pub async fn list_credentials<L: Ledger>(
    verifier: &Verifier<L>,
    owner: &str,
    out: &mut dyn Write,
) -> Result<u8> {
    let digests = verifier.recorded_credentials(owner).await;
    for digest in &digests {
        writeln!(out, "{digest}")?;
    }
    tracing::info!(owner, count = digests.len(), "listed credentials");
    Ok(if digests.is_empty() { 1 } else { 0 })
}
