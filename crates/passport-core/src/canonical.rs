//! Canonical JSON encoding for credential records.
//!
//! The digest of a credential is only meaningful if every party produces the
//! same bytes for the same claim. This module pins that encoding:
//!
//! - Object keys sorted ascending by their UTF-8 bytes, at every level
//! - Array order preserved
//! - Compact output, no whitespace
//! - Strings emitted as given (no Unicode normalization), escaped like
//!   `JSON.stringify`: `"`, `\` and control characters below U+0020
//! - Integers in plain decimal, only within `±(2^53 - 1)`, the range
//!   ECMAScript numbers hold exactly; `-0` and `0.0` become `0`
//! - Other floats in shortest round-trip form, only within
//!   `1e-6 <= |x| < 1e21`, the range where that form agrees with ECMAScript
//!   number formatting; anything else is rejected
//!
//! **This encoding is FROZEN.** Changing it orphans every digest already on
//! the ledger.

use serde_json::{Map, Number, Value};

use crate::error::EncodingError;
use crate::record::CredentialRecord;

/// Default nesting limit for canonicalization.
///
/// The root object counts as depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on any nesting limit. Larger limits are clamped to it.
pub const MAX_DEPTH_CEILING: usize = 256;

/// Largest integer magnitude written as-is. Beyond it, ECMAScript numbers
/// round and clients would disagree on the digits.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Smallest float magnitude written without an exponent.
const MIN_PLAIN_FLOAT: f64 = 1e-6;

/// Floats at or above this magnitude would need an exponent.
const MAX_PLAIN_FLOAT: f64 = 1e21;

/// Bytes produced exclusively by [`canonicalize`].
///
/// The inner buffer is private so that digest computation can only ever see
/// bytes that went through the canonical pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical text. Always valid UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonicalize a credential record with the default depth limit.
pub fn canonicalize(record: &CredentialRecord) -> Result<CanonicalBytes, EncodingError> {
    canonicalize_with_limit(record, DEFAULT_MAX_DEPTH)
}

/// Canonicalize a credential record, rejecting nesting deeper than `max_depth`.
///
/// `max_depth` is clamped to [`MAX_DEPTH_CEILING`].
pub fn canonicalize_with_limit(
    record: &CredentialRecord,
    max_depth: usize,
) -> Result<CanonicalBytes, EncodingError> {
    let mut encoder = Encoder::new(max_depth);
    encoder.write_object(record.as_map(), 0)?;
    Ok(CanonicalBytes(encoder.buf))
}

/// Canonicalize any JSON value (used for nested fragments and tests).
pub fn canonicalize_value(value: &Value, max_depth: usize) -> Result<CanonicalBytes, EncodingError> {
    let mut encoder = Encoder::new(max_depth);
    encoder.write_value(value, 0)?;
    Ok(CanonicalBytes(encoder.buf))
}

/// Recursive-descent writer with a depth bound.
struct Encoder {
    buf: Vec<u8>,
    max_depth: usize,
}

impl Encoder {
    fn new(max_depth: usize) -> Self {
        Self {
            buf: Vec::with_capacity(256),
            max_depth: max_depth.min(MAX_DEPTH_CEILING),
        }
    }

    /// Write `value`, which sits inside `depth` enclosing containers.
    fn write_value(&mut self, value: &Value, depth: usize) -> Result<(), EncodingError> {
        match value {
            Value::Null => self.buf.extend_from_slice(b"null"),
            Value::Bool(b) => {
                let literal: &[u8] = if *b { b"true" } else { b"false" };
                self.buf.extend_from_slice(literal);
            }
            Value::Number(n) => self.write_number(n)?,
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items, depth)?,
            Value::Object(map) => self.write_object(map, depth)?,
        }
        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<usize, EncodingError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(EncodingError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth)
    }

    fn write_array(&mut self, items: &[Value], depth: usize) -> Result<(), EncodingError> {
        let depth = self.enter(depth)?;
        self.buf.push(b'[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(b',');
            }
            self.write_value(item, depth)?;
        }
        self.buf.push(b']');
        Ok(())
    }

    fn write_object(&mut self, map: &Map<String, Value>, depth: usize) -> Result<(), EncodingError> {
        let depth = self.enter(depth)?;

        // String ordering is byte-wise on UTF-8, which is what we want.
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        self.buf.push(b'{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(b',');
            }
            self.write_string(key);
            self.buf.push(b':');
            self.write_value(value, depth)?;
        }
        self.buf.push(b'}');
        Ok(())
    }

    fn write_number(&mut self, n: &Number) -> Result<(), EncodingError> {
        if let Some(i) = n.as_i64() {
            if i.unsigned_abs() > MAX_SAFE_INTEGER {
                return Err(EncodingError::NonCanonicalNumber(i.to_string()));
            }
            self.buf.extend_from_slice(i.to_string().as_bytes());
            return Ok(());
        }
        if let Some(u) = n.as_u64() {
            // Anything not fitting i64 is far past the safe range.
            return Err(EncodingError::NonCanonicalNumber(u.to_string()));
        }

        let f = n
            .as_f64()
            .ok_or_else(|| EncodingError::NonCanonicalNumber(n.to_string()))?;

        if f == 0.0 {
            self.buf.push(b'0');
            return Ok(());
        }

        let magnitude = f.abs();
        if !f.is_finite() || magnitude < MIN_PLAIN_FLOAT || magnitude >= MAX_PLAIN_FLOAT {
            return Err(EncodingError::NonCanonicalNumber(f.to_string()));
        }

        // f64 Display is the shortest representation that round-trips.
        self.buf.extend_from_slice(f.to_string().as_bytes());
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.buf.push(b'"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.extend_from_slice(b"\\\""),
                '\\' => self.buf.extend_from_slice(b"\\\\"),
                '\u{08}' => self.buf.extend_from_slice(b"\\b"),
                '\u{0c}' => self.buf.extend_from_slice(b"\\f"),
                '\n' => self.buf.extend_from_slice(b"\\n"),
                '\r' => self.buf.extend_from_slice(b"\\r"),
                '\t' => self.buf.extend_from_slice(b"\\t"),
                c if (c as u32) < 0x20 => {
                    self.buf
                        .extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
                }
                c => {
                    let mut utf8 = [0u8; 4];
                    self.buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
        self.buf.push(b'"');
    }
}
