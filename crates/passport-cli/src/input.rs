//! Reading credential records from files.
//!
//! A file holds either one JSON object or an array of objects. `-` reads
//! standard input.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use reputation_passport::CredentialRecord;
use serde_json::Value;

/// Read all records in a file.
pub fn read_records(path: &Path) -> Result<Vec<CredentialRecord>> {
    let bytes = read_source(path)?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                CredentialRecord::from_value(item)
                    .with_context(|| format!("{} [{i}]", path.display()))
            })
            .collect(),
        other => {
            let record = CredentialRecord::from_value(other)
                .with_context(|| path.display().to_string())?;
            Ok(vec![record])
        }
    }
}

/// Read a file that must hold exactly one record.
pub fn read_single_record(path: &Path) -> Result<CredentialRecord> {
    let mut records = read_records(path)?;
    match records.len() {
        1 => Ok(records.remove(0)),
        n => anyhow::bail!("{} holds {n} records, expected exactly one", path.display()),
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading standard input")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}
