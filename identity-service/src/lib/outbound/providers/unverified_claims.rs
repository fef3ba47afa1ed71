use async_trait::async_trait;
use auth::Claims;
use auth::JwtHandler;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use crate::domain::provider::IdentityProvider;
use crate::domain::provider::ProviderError;
use crate::domain::provider::ProviderIdentity;

const SECURE_TOKEN_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Fallback provider re-deriving identity from a secure-token ID token without
/// checking its signature.
///
/// The issuer's public keys are not available locally, so only structure is
/// checked: expiry, issuer (`https://securetoken.google.com/<project_id>`),
/// and non-empty `sub` and `email`. Authenticity rests on the transport the
/// token arrived through.
pub struct UnverifiedClaimsProvider {
    expected_issuer: String,
    jwt_handler: JwtHandler,
}

impl UnverifiedClaimsProvider {
    pub fn new(project_id: &str) -> Self {
        Self {
            expected_issuer: format!("{}{}", SECURE_TOKEN_ISSUER_PREFIX, project_id),
            // Signature checks are disabled, the key is never used.
            jwt_handler: JwtHandler::new(&[]),
        }
    }

    /// Check claims at the given time (seconds since the epoch).
    pub fn identity_from_claims(
        &self,
        claims: &Claims,
        now_seconds: i64,
    ) -> Result<ProviderIdentity, ProviderError> {
        let exp = claims
            .exp
            .ok_or_else(|| ProviderError::InvalidToken("missing exp".to_string()))?;
        if exp < now_seconds {
            return Err(ProviderError::ExpiredToken);
        }

        let issuer = claims
            .iss
            .as_deref()
            .ok_or_else(|| ProviderError::InvalidToken("missing iss".to_string()))?;
        if issuer != self.expected_issuer {
            return Err(ProviderError::InvalidIssuer(issuer.to_string()));
        }

        let uid = claims
            .sub
            .as_deref()
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| ProviderError::InvalidToken("missing sub".to_string()))?;
        let email = claims
            .extra_str("email")
            .filter(|email| !email.is_empty())
            .ok_or_else(|| ProviderError::InvalidToken("missing email".to_string()))?;

        let mut profile = Map::new();
        profile.insert(
            "name".to_string(),
            Value::String(claims.extra_str("name").unwrap_or_default().to_string()),
        );
        profile.insert("email".to_string(), Value::String(email.to_string()));
        profile.insert(
            "picture".to_string(),
            Value::String(claims.extra_str("picture").unwrap_or_default().to_string()),
        );
        profile.insert("user_id".to_string(), Value::String(uid.to_string()));

        Ok(ProviderIdentity::new(uid, profile))
    }
}

#[async_trait]
impl IdentityProvider for UnverifiedClaimsProvider {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        let claims: Claims = self.jwt_handler.decode_unverified(token).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse provider token claims");
            ProviderError::InvalidToken(e.to_string())
        })?;

        self.identity_from_claims(&claims, Utc::now().timestamp())
    }
}
