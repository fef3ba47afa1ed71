use thiserror::Error;

use crate::domain::provider::errors::ProviderError;

/// Failure reported by a repository implementation.
///
/// `NotFound` and `Conflict` are outcomes the services act upon; `Storage`
/// carries backend detail that is logged and never returned to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record conflicts with an existing one: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Top-level error for every public identity and access operation.
///
/// Each variant is specific enough for a transport layer to pick a status
/// without inspecting internal state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid password policy: {0}")]
    InvalidPasswordPolicy(String),

    #[error("Username already exists: {0}")]
    UsernameExists(String),

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Expired token")]
    ExpiredToken,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Invalid access control entry: {0}")]
    InvalidAccessEntry(String),

    #[error("Access control entry not found: {0}")]
    AccessEntryNotFound(String),

    #[error("No identity provider configured")]
    ProviderNotConfigured,

    #[error("Identity provider error: {0}")]
    Provider(ProviderError),

    #[error("Internal error")]
    Internal,
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::PolicyViolation(_) => AuthError::InvalidPassword,
            auth::PasswordError::UnknownPolicy(level) => AuthError::InvalidPasswordPolicy(level),
            auth::PasswordError::HashingFailed(e) | auth::PasswordError::VerificationFailed(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                AuthError::Internal
            }
        }
    }
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => AuthError::ExpiredToken,
            auth::JwtError::InvalidIssuer(_) => AuthError::InvalidIssuer,
            auth::JwtError::InvalidToken(_)
            | auth::JwtError::DecodingFailed(_)
            | auth::JwtError::MissingClaim(_) => AuthError::InvalidToken,
            auth::JwtError::EncodingFailed(e) => {
                tracing::error!(error = %e, "Token signing failed");
                AuthError::Internal
            }
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidToken(_) => AuthError::InvalidToken,
            ProviderError::ExpiredToken => AuthError::ExpiredToken,
            ProviderError::InvalidIssuer(_) => AuthError::InvalidIssuer,
            other => AuthError::Provider(other),
        }
    }
}

impl From<RepositoryError> for AuthError {
    /// Fallback mapping; services translate `NotFound` and `Conflict`
    /// themselves where the record kind is known.
    fn from(err: RepositoryError) -> Self {
        tracing::error!(error = %err, "Repository operation failed");
        AuthError::Internal
    }
}
