//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding and digest of known records.
//! Any client that recomputes digests (browser, CLI, contract tooling) must
//! produce identical canonical text and digests for them.

use passport_core::{canonicalize, CredentialRecord, Digest};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The record as JSON text, keys deliberately out of order.
    pub record_json: &'static str,
    /// Expected canonical text.
    pub canonical: &'static str,
    /// Expected digest, `0x` + lowercase hex.
    pub digest: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "minimal owner/issuer/category record",
            record_json: r#"{"userWallet": "0xOWNER", "issuerWallet": "0xISSUER", "category": "cert"}"#,
            canonical: r#"{"category":"cert","issuerWallet":"0xISSUER","userWallet":"0xOWNER"}"#,
            digest: "0x66edbd431a7cdf797bc8db82cd32ad82c6fa71dcb556a71ab3a50277a3bc4d7f",
        },
        GoldenVector {
            name: "hackathon credential with nested data",
            record_json: r#"{
                "userWallet": "0x1111111111111111111111111111111111111111",
                "issuerWallet": "0x2222222222222222222222222222222222222222",
                "category": "hackathon",
                "data": {"title": "Winner", "tags": ["rust", "web3"], "score": 97.5, "rank": 1},
                "issuedAt": "2024-03-15"
            }"#,
            canonical: r#"{"category":"hackathon","data":{"rank":1,"score":97.5,"tags":["rust","web3"],"title":"Winner"},"issuedAt":"2024-03-15","issuerWallet":"0x2222222222222222222222222222222222222222","userWallet":"0x1111111111111111111111111111111111111111"}"#,
            digest: "0xa6de6b55230f3fa23b23790f23e38e9c1e32d02f2eee8d56b2d6046d40593cd1",
        },
        GoldenVector {
            name: "empty record",
            record_json: "{}",
            canonical: "{}",
            digest: "0x44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        },
        GoldenVector {
            name: "escapes, negative zero, and literals",
            record_json: r#"{"zero": -0.0, "note": "line\nbreak \"quoted\" é", "flags": [true, false, null]}"#,
            canonical: r#"{"flags":[true,false,null],"note":"line\nbreak \"quoted\" é","zero":0}"#,
            digest: "0x9a5d236813676ce6ec823b53e01b4ac2acf6e731709e57fb0258a045597b227d",
        },
        GoldenVector {
            name: "byte-wise key order and float formatting",
            record_json: r#"{"é": "x", "a": [0.1, 1e20, -3], "B": 1}"#,
            canonical: r#"{"B":1,"a":[0.1,100000000000000000000,-3],"é":"x"}"#,
            digest: "0xa4264fd68b589435da4ba3312c71ac40612cf69b339a7894c191a66002a2e03c",
        },
    ]
}

/// Parse a vector's record.
pub fn record_from_vector(vector: &GoldenVector) -> CredentialRecord {
    CredentialRecord::from_json_str(vector.record_json).expect("golden vector record must parse")
}

/// Check every vector, returning a description of each mismatch.
pub fn verify_all_vectors() -> Vec<String> {
    let mut failures = Vec::new();

    for vector in all_vectors() {
        let record = record_from_vector(&vector);
        let canonical = match canonicalize(&record) {
            Ok(canonical) => canonical,
            Err(e) => {
                failures.push(format!("{}: {e}", vector.name));
                continue;
            }
        };

        if canonical.as_str() != vector.canonical {
            failures.push(format!(
                "{}: canonical mismatch\n  expected {}\n  actual   {}",
                vector.name,
                vector.canonical,
                canonical.as_str()
            ));
        }

        let digest = Digest::of(&canonical).to_string();
        if digest != vector.digest {
            failures.push(format!(
                "{}: digest mismatch\n  expected {}\n  actual   {digest}",
                vector.name, vector.digest
            ));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        let failures = verify_all_vectors();
        assert!(failures.is_empty(), "{}", failures.join("\n"));
    }

    #[test]
    fn test_vector_digests_parse() {
        for vector in all_vectors() {
            let digest: Digest = vector.digest.parse().unwrap();
            assert_eq!(digest.to_string(), vector.digest);
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
