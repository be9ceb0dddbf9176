//! # passport CLI
//!
//! Subcommand handlers for the `passport` binary. Each handler returns the
//! process exit code: 0 on success, 1 when a credential did not verify or
//! was not found. Errors map to exit code 2 in `main`.

pub mod connection;
pub mod hash;
pub mod input;
pub mod issue;
pub mod query;
pub mod verify;
