//! Network table and environment configuration for the contract ledger.

use std::fmt;
use std::str::FromStr;

use ethers::types::Address;
use passport_ledger::LedgerError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "PASSPORT_RPC_URL";

/// Environment variable holding the deployed contract address.
pub const ENV_CONTRACT_ADDRESS: &str = "PASSPORT_CONTRACT_ADDRESS";

/// Environment variable selecting the network (`amoy` or `sepolia`).
pub const ENV_NETWORK: &str = "PASSPORT_NETWORK";

/// Networks the passport contract is deployed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Polygon Amoy testnet.
    #[default]
    Amoy,
    /// Ethereum Sepolia testnet.
    Sepolia,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Amoy, Network::Sepolia];

    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Amoy => 80002,
            Network::Sepolia => 11155111,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Network::Amoy => "Polygon Amoy",
            Network::Sepolia => "Ethereum Sepolia",
        }
    }

    /// Public RPC endpoint used when none is configured.
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Amoy => "https://rpc-amoy.polygon.technology",
            Network::Sepolia => "https://rpc.sepolia.org",
        }
    }

    /// Look up a supported network by chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Network {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amoy" | "polygon-amoy" | "80002" => Ok(Network::Amoy),
            "sepolia" | "ethereum-sepolia" | "11155111" => Ok(Network::Sepolia),
            other => Err(LedgerError::NotConfigured(format!("unsupported network: {other}"))),
        }
    }
}

/// Connection settings for [`EvmLedger`](crate::EvmLedger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmLedgerConfig {
    pub network: Network,
    pub rpc_url: String,
    pub contract_address: Address,
}

impl EvmLedgerConfig {
    /// Settings for `network` with its default RPC endpoint.
    pub fn new(network: Network, contract_address: Address) -> Self {
        Self {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            contract_address,
        }
    }

    /// Override the RPC endpoint.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Read settings from the process environment.
    ///
    /// A missing contract address is `LedgerError::NotConfigured`.
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LedgerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network = match present(ENV_NETWORK) {
            Some(name) => name.parse()?,
            None => Network::default(),
        };

        let address = present(ENV_CONTRACT_ADDRESS).ok_or_else(|| {
            LedgerError::NotConfigured(format!("contract address not set ({ENV_CONTRACT_ADDRESS})"))
        })?;
        let contract_address: Address = address.trim().parse().map_err(|_| {
            LedgerError::NotConfigured(format!("invalid contract address: {address}"))
        })?;
        if contract_address == Address::zero() {
            return Err(LedgerError::NotConfigured(
                "contract address is zero; deploy and update configuration".into(),
            ));
        }

        let rpc_url = present(ENV_RPC_URL).unwrap_or_else(|| network.default_rpc_url().to_string());

        Ok(Self {
            network,
            rpc_url,
            contract_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ADDRESS: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_network_table() {
        assert_eq!(Network::Amoy.chain_id(), 80002);
        assert_eq!(Network::Sepolia.chain_id(), 11155111);
        assert_eq!(Network::from_chain_id(80002), Some(Network::Amoy));
        assert_eq!(Network::from_chain_id(1), None);
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("Amoy".parse::<Network>().unwrap(), Network::Amoy);
        assert_eq!("11155111".parse::<Network>().unwrap(), Network::Sepolia);
        assert!(matches!(
            "mainnet".parse::<Network>(),
            Err(LedgerError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_missing_contract_address() {
        let err = EvmLedgerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, LedgerError::NotConfigured(_)));

        let err = EvmLedgerConfig::from_lookup(lookup(&[(ENV_CONTRACT_ADDRESS, "  ")])).unwrap_err();
        assert!(matches!(err, LedgerError::NotConfigured(_)));
    }

    #[test]
    fn test_zero_or_garbage_address_rejected() {
        let zero = format!("0x{}", "0".repeat(40));
        assert!(EvmLedgerConfig::from_lookup(lookup(&[(ENV_CONTRACT_ADDRESS, zero.as_str())])).is_err());
        assert!(EvmLedgerConfig::from_lookup(lookup(&[(ENV_CONTRACT_ADDRESS, "0xnope")])).is_err());
    }

    #[test]
    fn test_defaults_from_network() {
        let config = EvmLedgerConfig::from_lookup(lookup(&[(ENV_CONTRACT_ADDRESS, ADDRESS)])).unwrap();
        assert_eq!(config.network, Network::Amoy);
        assert_eq!(config.rpc_url, "https://rpc-amoy.polygon.technology");
        assert_eq!(config.contract_address, ADDRESS.parse::<Address>().unwrap());
    }

    #[test]
    fn test_explicit_settings() {
        let config = EvmLedgerConfig::from_lookup(lookup(&[
            (ENV_CONTRACT_ADDRESS, ADDRESS),
            (ENV_NETWORK, "sepolia"),
            (ENV_RPC_URL, "http://localhost:8545"),
        ]))
        .unwrap();
        assert_eq!(config.network, Network::Sepolia);
        assert_eq!(config.rpc_url, "http://localhost:8545");
    }
}
