//! # Reputation Passport Ledger
//!
//! Ledger abstraction for Reputation Passport. The ledger is the external
//! system of record that maps credential digests to the issuer that recorded
//! them.
//!
//! ## Key Types
//!
//! - [`Ledger`] - Async read interface used by the verifier
//! - [`LedgerWriter`] - Async write interface used by the issuance path
//! - [`MemoryLedger`] - In-memory ledger for tests and local runs
//! - [`LedgerEntry`] - A recorded digest with its issuer and category
//!
//! ## Design Notes
//!
//! - **Immutable entries**: a digest is recorded once; recording it again fails
//!   with `AlreadyRecorded`
//! - **Whitelisted issuers**: only authorized identities may write
//! - **Case-insensitive identities**: wallets compare without regard to case

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use traits::{Ledger, LedgerEntry, LedgerWriter, RecordReceipt};
