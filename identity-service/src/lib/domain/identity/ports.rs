use async_trait::async_trait;

use super::models::Identity;
use super::models::SignUpCommand;
use super::models::Token;
use crate::domain::errors::AuthError;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a local identity.
    ///
    /// # Arguments
    /// * `command` - Username, plain text password, optional id and role
    ///
    /// # Returns
    /// Created identity (with the default role when none was given)
    ///
    /// # Errors
    /// * `InvalidPassword` - Password does not meet the configured policy
    /// * `InvalidPasswordPolicy` - Configured policy level is unknown
    /// * `UsernameExists` - Username or id is already taken
    /// * `Internal` - Hashing or persistence failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Identity, AuthError>;

    /// Authenticate with username and password.
    ///
    /// # Returns
    /// Signed token carrying `id`, `username` and `role_id`
    ///
    /// # Errors
    /// * `IdentityNotFound` - No identity with this username
    /// * `PasswordMismatch` - Password does not match
    /// * `Internal` - Persistence or signing failed
    async fn sign_in(&self, username: &str, password: &str) -> Result<Token, AuthError>;

    /// Register the identity behind an identity-provider token.
    ///
    /// # Errors
    /// * `ProviderNotConfigured` - No provider was attached
    /// * `InvalidToken` / `ExpiredToken` / `InvalidIssuer` / `Provider` - Resolution failed
    /// * `UsernameExists` - An identity with the provider uid already exists
    async fn sign_up_with_provider(&self, token: &str) -> Result<Identity, AuthError>;

    /// Authenticate with an identity-provider token.
    ///
    /// # Returns
    /// Signed token whose payload also carries the provider's profile claims
    ///
    /// # Errors
    /// * `ProviderNotConfigured` - No provider was attached
    /// * `InvalidToken` / `ExpiredToken` / `InvalidIssuer` / `Provider` - Resolution failed
    /// * `IdentityNotFound` - The provider identity has not signed up
    async fn sign_in_with_provider(&self, token: &str) -> Result<Token, AuthError>;

    /// Verify a locally issued token; storage is not consulted.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` / `InvalidIssuer`
    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;

    /// Verify a token, then authorize its identity for `(resource, payload)`.
    ///
    /// Token failures are returned before any access rule, including the
    /// static bypass, is evaluated.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` / `InvalidIssuer`
    /// * `PermissionDenied` - No rule grants the action
    async fn verify_token_and_authorize(
        &self,
        token: &str,
        resource: &str,
        payload: &str,
    ) -> Result<Identity, AuthError>;

    /// # Errors
    /// * `IdentityNotFound`
    /// * `InvalidPassword` / `InvalidPasswordPolicy` - New password rejected
    /// * `PasswordMismatch` - Old password does not match
    async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// # Errors
    /// * `IdentityNotFound`
    async fn change_role(&self, id: &str, role_id: &str) -> Result<Identity, AuthError>;

    /// Whether an identity with this id exists.
    async fn check_auth(&self, id: &str) -> Result<bool, AuthError>;

    /// Whether the identity behind a provider token has signed up.
    async fn check_auth_with_provider(&self, token: &str) -> Result<bool, AuthError>;

    async fn get_by_id(&self, id: &str) -> Result<Identity, AuthError>;

    async fn get_by_username(&self, username: &str) -> Result<Identity, AuthError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Identity>, AuthError>;

    /// Replace a stored identity.
    ///
    /// # Errors
    /// * `IdentityNotFound`
    /// * `UsernameExists` - New username is taken
    async fn update(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// # Errors
    /// * `PermissionDenied` - The identity is static
    /// * `IdentityNotFound`
    async fn delete(&self, id: &str) -> Result<(), AuthError>;
}

/// Persistence operations for identities.
///
/// Implementations must enforce id and username uniqueness atomically and
/// report violations as `Conflict`; missing records on update/delete are
/// `NotFound`.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    async fn create(&self, identity: Identity) -> Result<Identity, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, RepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, RepositoryError>;

    async fn find_by_username_and_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Identity>, RepositoryError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Identity>, RepositoryError>;

    async fn update(&self, identity: Identity) -> Result<Identity, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
