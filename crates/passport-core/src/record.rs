//! Credential records: the off-chain claim data that gets hashed.
//!
//! A [`CredentialRecord`] is schemaless. Issuers put whatever they like in it;
//! the verifier only looks at the `userWallet` and `issuerWallet` claims. The
//! typed [`Credential`] covers the shape the passport front end produces.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EncodingError;

/// Conventional field names inside a credential record.
pub mod fields {
    pub const USER_WALLET: &str = "userWallet";
    pub const ISSUER_WALLET: &str = "issuerWallet";
    pub const CATEGORY: &str = "category";
    pub const ISSUED_AT: &str = "issuedAt";
    pub const DATA: &str = "data";
}

/// An arbitrary JSON object describing a credential claim.
///
/// Key insertion order is retained for display; it never affects the digest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRecord(Map<String, Value>);

impl CredentialRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Convert a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, EncodingError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(EncodingError::NotAnObject(kind_name(&other))),
        }
    }

    /// Parse a record from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, EncodingError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| EncodingError::MalformedJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a record from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| EncodingError::MalformedJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a field, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The claimed owner wallet.
    pub fn user_wallet(&self) -> Option<&str> {
        self.get_str(fields::USER_WALLET)
    }

    /// The claimed issuer wallet.
    pub fn issuer_wallet(&self) -> Option<&str> {
        self.get_str(fields::ISSUER_WALLET)
    }

    /// The credential category.
    pub fn category(&self) -> Option<&str> {
        self.get_str(fields::CATEGORY)
    }

    /// Borrow the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for CredentialRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for CredentialRecord {
    type Error = EncodingError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// The typed credential shape used by the passport front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub user_wallet: String,
    pub issuer_wallet: String,
    pub category: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub issued_at: String,
}

impl Credential {
    /// Build the schemaless record that gets hashed.
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord::new()
            .with(fields::USER_WALLET, self.user_wallet.clone())
            .with(fields::ISSUER_WALLET, self.issuer_wallet.clone())
            .with(fields::CATEGORY, self.category.clone())
            .with(fields::DATA, Value::Object(self.data.clone()))
            .with(fields::ISSUED_AT, self.issued_at.clone())
    }
}

impl From<Credential> for CredentialRecord {
    fn from(credential: Credential) -> Self {
        credential.to_record()
    }
}

/// Human-readable JSON kind, for error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = CredentialRecord::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err, EncodingError::NotAnObject("array"));

        let err = CredentialRecord::from_value(json!("cert")).unwrap_err();
        assert_eq!(err, EncodingError::NotAnObject("string"));
    }

    #[test]
    fn test_from_json_str_malformed() {
        let err = CredentialRecord::from_json_str("{\"userWallet\": ").unwrap_err();
        assert!(matches!(err, EncodingError::MalformedJson(_)));
    }

    #[test]
    fn test_from_json_str_rejects_nan_literal() {
        let err = CredentialRecord::from_json_str("{\"score\": NaN}").unwrap_err();
        assert!(matches!(err, EncodingError::MalformedJson(_)));
    }

    #[test]
    fn test_wallet_accessors() {
        let record = CredentialRecord::new()
            .with("userWallet", "0xOWNER")
            .with("issuerWallet", "0xISSUER")
            .with("category", "cert");

        assert_eq!(record.user_wallet(), Some("0xOWNER"));
        assert_eq!(record.issuer_wallet(), Some("0xISSUER"));
        assert_eq!(record.category(), Some("cert"));
    }

    #[test]
    fn test_non_string_wallet_is_absent() {
        let record = CredentialRecord::new().with("userWallet", 42);
        assert_eq!(record.user_wallet(), None);
    }

    #[test]
    fn test_typed_credential_to_record() {
        let credential: Credential = serde_json::from_value(json!({
            "userWallet": "0xaaa",
            "issuerWallet": "0xbbb",
            "category": "hackathon",
            "data": {"title": "Winner"},
            "issuedAt": "2024-03-15"
        }))
        .unwrap();

        let record = credential.to_record();
        assert_eq!(record.len(), 5);
        assert_eq!(record.get("data"), Some(&json!({"title": "Winner"})));
        assert_eq!(record.get_str("issuedAt"), Some("2024-03-15"));
    }

    #[test]
    fn test_record_serde_is_transparent() {
        let record = CredentialRecord::new().with("category", "cert");
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"category":"cert"}"#);
    }
}
