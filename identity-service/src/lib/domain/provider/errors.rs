use thiserror::Error;

/// Error reported by an identity provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Token rejected as invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,

    #[error("Token issuer is not trusted: {0}")]
    InvalidIssuer(String),

    /// The provider refused the token for its own reasons (revoked, unknown key, ...).
    #[error("Provider rejected token: {0}")]
    Rejected(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
