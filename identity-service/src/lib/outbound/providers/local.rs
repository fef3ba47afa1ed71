use std::sync::Arc;

use async_trait::async_trait;
use auth::JwtError;
use auth::TokenService;

use crate::domain::provider::IdentityProvider;
use crate::domain::provider::ProviderError;
use crate::domain::provider::ProviderIdentity;

/// Provider trusting tokens minted by a [`TokenService`].
///
/// Useful when a sibling service (or a test) acts as the identity provider:
/// the uid is the payload `id` and the whole payload becomes the claims.
pub struct LocalTokenProvider {
    tokens: Arc<TokenService>,
}

impl LocalTokenProvider {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for LocalTokenProvider {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        let (subject, payload) = self.tokens.verify(token).map_err(|e| match e {
            JwtError::TokenExpired => ProviderError::ExpiredToken,
            JwtError::InvalidIssuer(issuer) => ProviderError::InvalidIssuer(issuer),
            other => ProviderError::InvalidToken(other.to_string()),
        })?;

        Ok(ProviderIdentity::new(subject.id, payload))
    }
}
