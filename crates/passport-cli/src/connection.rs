//! Ledger connection arguments shared by the networked subcommands.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use reputation_passport::evm::{EvmLedgerConfig, ENV_CONTRACT_ADDRESS, ENV_NETWORK, ENV_RPC_URL};
use reputation_passport::VerifierConfig;

/// Where the passport contract lives.
///
/// Each flag falls back to its environment variable (also read from `.env`).
#[derive(Args, Debug, Clone, Default)]
pub struct LedgerArgs {
    /// JSON-RPC endpoint. Defaults to the network's public endpoint.
    #[arg(long, env = "PASSPORT_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Deployed ReputationPassport contract address.
    #[arg(long, env = "PASSPORT_CONTRACT_ADDRESS")]
    pub contract: Option<String>,

    /// Network name or chain id (amoy, sepolia).
    #[arg(long, env = "PASSPORT_NETWORK")]
    pub network: Option<String>,

    /// Per-query timeout in seconds. 0 waits indefinitely.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

impl LedgerArgs {
    /// Contract ledger settings from the flags.
    pub fn evm_config(&self) -> Result<EvmLedgerConfig> {
        let config = EvmLedgerConfig::from_lookup(|key| match key {
            ENV_RPC_URL => self.rpc_url.clone(),
            ENV_CONTRACT_ADDRESS => self.contract.clone(),
            ENV_NETWORK => self.network.clone(),
            _ => None,
        })?;
        Ok(config)
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            query_timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            ..VerifierConfig::default()
        }
    }
}
