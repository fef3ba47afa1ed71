use chrono::Duration;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenEnvelope;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity fields carried in a token payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSubject {
    pub id: String,
    pub username: String,
    pub role_id: String,
}

/// Issues and verifies signed claim envelopes.
///
/// Verification is offline: signature, issuer and expiry are checked against
/// local configuration only.
pub struct TokenService {
    jwt_handler: JwtHandler,
    issuer: String,
    lifetime: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - HS256 signing secret
    /// * `issuer` - Value written to and required in `iss`
    /// * `lifetime` - Time between `iat` and `exp`
    pub fn new(secret: &[u8], issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            issuer: issuer.into(),
            lifetime,
        }
    }

    /// Sign a token for `subject`.
    ///
    /// `extra` is merged into the payload first; `id`, `username` and
    /// `role_id` from `subject` always win.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(
        &self,
        subject: &TokenSubject,
        extra: Map<String, Value>,
    ) -> Result<String, JwtError> {
        let mut payload = extra;
        payload.insert("id".to_string(), Value::String(subject.id.clone()));
        payload.insert(
            "username".to_string(),
            Value::String(subject.username.clone()),
        );
        payload.insert("role_id".to_string(), Value::String(subject.role_id.clone()));

        let now = Utc::now().timestamp_millis();
        let envelope = TokenEnvelope {
            payload,
            exp: now.saturating_add(self.lifetime.num_milliseconds()),
            iat: now,
            iss: self.issuer.clone(),
        };

        self.jwt_handler.encode(&envelope)
    }

    /// Verify a token at the current time.
    ///
    /// See [`TokenService::verify_at`].
    pub fn verify(&self, token: &str) -> Result<(TokenSubject, Map<String, Value>), JwtError> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Verify a token against a given clock (milliseconds since the epoch).
    ///
    /// An optional `Bearer ` prefix is stripped. The subject is rebuilt from
    /// the payload alone.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed structure, or missing/mistyped `id`
    /// * `InvalidIssuer` - `iss` differs from the configured issuer
    /// * `TokenExpired` - `exp` is strictly before `now_millis`
    pub fn verify_at(
        &self,
        token: &str,
        now_millis: i64,
    ) -> Result<(TokenSubject, Map<String, Value>), JwtError> {
        let token = strip_bearer(token);

        let envelope: TokenEnvelope = self.jwt_handler.decode(token).map_err(|e| match e {
            JwtError::DecodingFailed(reason) => JwtError::InvalidToken(reason),
            other => other,
        })?;

        if envelope.iss != self.issuer {
            return Err(JwtError::InvalidIssuer(envelope.iss));
        }

        if envelope.is_expired(now_millis) {
            return Err(JwtError::TokenExpired);
        }

        let subject = subject_from_envelope(&envelope)?;

        Ok((subject, envelope.payload))
    }
}

/// Remove an optional `Bearer ` prefix.
pub fn strip_bearer(token: &str) -> &str {
    token.strip_prefix(BEARER_PREFIX).unwrap_or(token)
}

fn subject_from_envelope(envelope: &TokenEnvelope) -> Result<TokenSubject, JwtError> {
    let mistyped = |field: String| JwtError::InvalidToken(format!("claim {} is not a string", field));

    let id = envelope
        .payload_str("id")
        .map_err(mistyped)?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| JwtError::MissingClaim("payload.id".to_string()))?;
    let username = envelope.payload_str("username").map_err(mistyped)?;
    let role_id = envelope.payload_str("role_id").map_err(mistyped)?;

    Ok(TokenSubject {
        id: id.to_string(),
        username: username.unwrap_or_default().to_string(),
        role_id: role_id.unwrap_or_default().to_string(),
    })
}
