//! `passport hash`: print the digest (or canonical text) of credential files.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use reputation_passport::{canonicalize, hash_record};

use crate::input::read_records;

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Credential JSON file (`-` for standard input).
    pub file: PathBuf,

    /// Print the canonical text instead of the digest.
    #[arg(long)]
    pub canonical: bool,
}

pub fn run_hash(args: &HashArgs, out: &mut dyn Write) -> Result<u8> {
    for record in read_records(&args.file)? {
        if args.canonical {
            writeln!(out, "{}", canonicalize(&record)?.as_str())?;
        } else {
            writeln!(out, "{}", hash_record(&record)?)?;
        }
    }
    Ok(0)
}
