//! # passport CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use passport_cli::hash::{run_hash, HashArgs};
use passport_cli::issue::{run_issue, IssueArgs};
use passport_cli::query::{run_exists, run_list, ExistsArgs, ListArgs};
use passport_cli::verify::{run_verify, VerifyArgs};

/// Reputation Passport CLI
///
/// Hash credential records, verify them against the ReputationPassport
/// contract, and issue new credentials as a whitelisted issuer.
#[derive(Parser, Debug)]
#[command(name = "passport", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical digest of credential records.
    Hash(HashArgs),

    /// Verify credential records belong to an owner and are on the ledger.
    Verify(VerifyArgs),

    /// Check whether a digest is recorded.
    Exists(ExistsArgs),

    /// List the digests recorded for an owner.
    List(ListArgs),

    /// Record a credential on the ledger as its issuer.
    Issue(IssueArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Hash(args) => run_hash(args, &mut stdout),
        Commands::Verify(args) => run_verify(args, &mut stdout).await,
        Commands::Exists(args) => run_exists(args, &mut stdout).await,
        Commands::List(args) => run_list(args, &mut stdout).await,
        Commands::Issue(args) => run_issue(args, &mut stdout).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
