use async_trait::async_trait;

use super::errors::ProviderError;
use super::models::ProviderIdentity;

/// Capability to turn an externally issued token into an identity.
///
/// Implementations may perform network I/O. Cancellation and deadlines are
/// owned by the caller: dropping the future aborts the call.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Verify a token and return the identity it represents.
    ///
    /// # Arguments
    /// * `token` - Raw token, without a `Bearer ` prefix
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed or lacks required claims
    /// * `ExpiredToken` - Token is past its expiry
    /// * `InvalidIssuer` - Token comes from an untrusted issuer
    /// * `Rejected` / `Unavailable` - Provider-specific failure
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError>;
}
