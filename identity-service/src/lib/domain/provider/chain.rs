use std::sync::Arc;

use async_trait::async_trait;

use super::errors::ProviderError;
use super::models::ProviderIdentity;
use super::ports::IdentityProvider;

/// Two-stage provider: a primary verifier with a fallback consulted only when
/// the primary rejects the token.
///
/// When both stages fail, the fallback's error is reported.
#[derive(Clone)]
pub struct ProviderChain {
    primary: Arc<dyn IdentityProvider>,
    fallback: Arc<dyn IdentityProvider>,
}

impl ProviderChain {
    pub fn new(primary: Arc<dyn IdentityProvider>, fallback: Arc<dyn IdentityProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Resolve a token, stripping an optional `Bearer ` prefix first.
    pub async fn resolve(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        let token = auth::strip_bearer(token);

        match self.primary.verify(token).await {
            Ok(identity) => Ok(identity),
            Err(primary_error) => {
                tracing::debug!(
                    error = %primary_error,
                    "Primary identity provider rejected token, trying fallback"
                );
                self.fallback.verify(token).await
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for ProviderChain {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        self.resolve(token).await
    }
}
