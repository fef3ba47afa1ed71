use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Claims envelope of a locally issued token.
///
/// Timestamps are milliseconds since the Unix epoch. `payload` always carries
/// `id`, and conventionally `username` and `role_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenEnvelope {
    pub payload: Map<String, Value>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl TokenEnvelope {
    /// Check if the envelope is expired at the given time (milliseconds).
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.exp < now_millis
    }

    /// Read a string field from the payload.
    ///
    /// Returns `Err` with the field name when the field is present but not a
    /// string, `Ok(None)` when it is absent or null.
    pub fn payload_str(&self, key: &str) -> Result<Option<&str>, String> {
        match self.payload.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(key.to_string()),
        }
    }
}

/// Registered claims of an externally issued token.
///
/// Timestamps are seconds since the Unix epoch, as in RFC 7519. Anything not
/// listed here (profile fields such as `email`, `name`, `picture`, or `aud`)
/// lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get a string custom field; non-string values read as absent.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }

    /// Check if token is expired (seconds). Tokens without `exp` never expire.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}
