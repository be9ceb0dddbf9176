//! # Reputation Passport EVM Ledger
//!
//! [`Ledger`](passport_ledger::Ledger) and
//! [`LedgerWriter`](passport_ledger::LedgerWriter) over the ReputationPassport
//! contract, using `ethers`.
//!
//! ```rust,no_run
//! use passport_ledger::Ledger;
//! use passport_ledger_evm::{EvmLedger, EvmLedgerConfig};
//!
//! async fn example() {
//!     let config = EvmLedgerConfig::from_env().unwrap();
//!     let ledger = EvmLedger::connect(&config).unwrap();
//!     let count = ledger.credential_count("0x1111111111111111111111111111111111111111").await;
//! }
//! ```

pub mod config;
pub mod ledger;

pub use config::{EvmLedgerConfig, Network, ENV_CONTRACT_ADDRESS, ENV_NETWORK, ENV_RPC_URL};
pub use ledger::{passport_abi, EvmLedger, ReadOnlyLedger, SignerClient, PASSPORT_ABI_JSON};
