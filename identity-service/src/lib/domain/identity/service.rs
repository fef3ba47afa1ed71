use std::sync::Arc;

use async_trait::async_trait;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenService;
use serde_json::Map;

use super::models::Identity;
use super::models::SignUpCommand;
use super::models::StaticIdentitySet;
use super::models::Token;
use super::ports::AuthServicePort;
use super::ports::IdentityRepository;
use crate::domain::access::AccessRepository;
use crate::domain::access::AccessService;
use crate::domain::access::AccessServicePort;
use crate::domain::errors::AuthError;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::provider::IdentityProvider;
use crate::domain::provider::ProviderIdentity;
use crate::domain::timestamp_id;

/// Policy knobs for the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Password policy level name (`level1`, `level2`, `level3`).
    pub password_policy: String,
    pub hash_cost: HashCost,
    /// Role given to identities created without one.
    pub default_role_id: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password_policy: "level1".to_string(),
            hash_cost: HashCost::Default,
            default_role_id: "default".to_string(),
        }
    }
}

/// Authentication orchestrator.
///
/// Composes password policy, hashing, token issuance, identity-provider
/// resolution and access control over an identity repository. Holds no
/// mutable state of its own; every call is independent.
pub struct AuthService<IR, AR>
where
    IR: IdentityRepository,
    AR: AccessRepository,
{
    repository: Arc<IR>,
    access: AccessService<AR>,
    tokens: Arc<TokenService>,
    provider: Option<Arc<dyn IdentityProvider>>,
    static_identities: Arc<StaticIdentitySet>,
    settings: AuthSettings,
    password_hasher: PasswordHasher,
}

impl<IR, AR> AuthService<IR, AR>
where
    IR: IdentityRepository,
    AR: AccessRepository,
{
    /// Create an authentication service.
    ///
    /// The access service is built over `access_repository` and shares the
    /// same static identity snapshot.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `access_repository` - Access-control entry persistence implementation
    /// * `tokens` - Token issuer/verifier
    /// * `static_identities` - Pre-provisioned identities
    /// * `settings` - Policy, hash cost and default role
    pub fn new(
        repository: Arc<IR>,
        access_repository: Arc<AR>,
        tokens: Arc<TokenService>,
        static_identities: Arc<StaticIdentitySet>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            repository,
            access: AccessService::new(access_repository, Arc::clone(&static_identities)),
            tokens,
            provider: None,
            static_identities,
            password_hasher: PasswordHasher::with_cost(settings.hash_cost),
            settings,
        }
    }

    /// Attach the identity provider used by the provider operations.
    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn access(&self) -> &AccessService<AR> {
        &self.access
    }

    pub fn static_identities(&self) -> &StaticIdentitySet {
        &self.static_identities
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Sign up every static identity.
    ///
    /// Identities that already exist are logged and skipped, so running this
    /// on every start is safe.
    ///
    /// # Returns
    /// Number of identities created by this call
    ///
    /// # Errors
    /// Any sign-up failure other than `UsernameExists`
    pub async fn provision_static_identities(&self) -> Result<usize, AuthError> {
        let mut created = 0;
        for identity in self.static_identities.identities() {
            match self.sign_up(SignUpCommand::from(identity)).await {
                Ok(_) => created += 1,
                Err(AuthError::UsernameExists(_)) => {
                    tracing::info!(
                        identity_id = %identity.id,
                        username = %identity.username,
                        "Static identity already provisioned"
                    );
                }
                Err(e) => {
                    tracing::error!(identity_id = %identity.id, error = %e, "Failed to provision static identity");
                    return Err(e);
                }
            }
        }

        tracing::info!(
            created,
            total = self.static_identities.len(),
            "Static identities provisioned"
        );
        Ok(created)
    }

    async fn resolve_provider_identity(&self, token: &str) -> Result<ProviderIdentity, AuthError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(AuthError::ProviderNotConfigured)?;

        provider
            .verify(auth::strip_bearer(token))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity provider token rejected");
                AuthError::from(e)
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Identity, AuthError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(id.to_string()))
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        let id = identity.id.clone();
        let username = identity.username.clone();
        self.repository.update(identity).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => AuthError::IdentityNotFound(id),
            RepositoryError::Conflict(_) => AuthError::UsernameExists(username),
            other => other.into(),
        })
    }

    /// Give an identity the default role if it has none, persisting the change.
    async fn backfill_role(&self, mut identity: Identity) -> Result<Identity, AuthError> {
        if !identity.role_id.is_empty() {
            return Ok(identity);
        }

        identity.role_id = self.settings.default_role_id.clone();
        tracing::info!(
            identity_id = %identity.id,
            role_id = %identity.role_id,
            "Assigning default role"
        );
        self.save(identity).await
    }

    fn password_matches(&self, identity: &Identity, password: &str) -> Result<bool, AuthError> {
        if !identity.has_password() {
            return Ok(false);
        }
        Ok(self
            .password_hasher
            .verify(password, &identity.password_hash)?)
    }
}

#[async_trait]
impl<IR, AR> AuthServicePort for AuthService<IR, AR>
where
    IR: IdentityRepository,
    AR: AccessRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Identity, AuthError> {
        let id = command
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(timestamp_id);

        auth::validate_password(&command.password, &self.settings.password_policy)?;

        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameExists(command.username));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let identity = Identity {
            id,
            username: command.username,
            password_hash,
            role_id: command
                .role_id
                .filter(|role| !role.is_empty())
                .unwrap_or_else(|| self.settings.default_role_id.clone()),
        };
        let username = identity.username.clone();

        let created = self.repository.create(identity).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameExists(username),
            other => other.into(),
        })?;

        tracing::info!(
            identity_id = %created.id,
            username = %created.username,
            role_id = %created.role_id,
            "Identity signed up"
        );
        Ok(created)
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        let identity = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(username.to_string()))?;

        let identity = self.backfill_role(identity).await?;

        if !self.password_matches(&identity, password)? {
            tracing::warn!(identity_id = %identity.id, "Sign-in with wrong password");
            return Err(AuthError::PasswordMismatch);
        }

        let jwt = self.tokens.issue(&identity.token_subject(), Map::new())?;
        Ok(Token::for_identity(jwt, &identity))
    }

    async fn sign_up_with_provider(&self, token: &str) -> Result<Identity, AuthError> {
        let resolved = self.resolve_provider_identity(token).await?;

        if self.repository.find_by_id(&resolved.uid).await?.is_some() {
            return Err(AuthError::UsernameExists(resolved.uid));
        }

        let identity = Identity {
            id: resolved.uid.clone(),
            username: resolved.uid.clone(),
            password_hash: String::new(),
            role_id: self.settings.default_role_id.clone(),
        };

        let created = self.repository.create(identity).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameExists(resolved.uid),
            other => other.into(),
        })?;

        tracing::info!(identity_id = %created.id, "Identity signed up with provider");
        Ok(created)
    }

    async fn sign_in_with_provider(&self, token: &str) -> Result<Token, AuthError> {
        let resolved = self.resolve_provider_identity(token).await?;

        let identity = self.find_by_id(&resolved.uid).await?;
        let identity = self.backfill_role(identity).await?;

        let jwt = self.tokens.issue(&identity.token_subject(), resolved.claims)?;
        Ok(Token::for_identity(jwt, &identity))
    }

    async fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let (subject, _payload) = self.tokens.verify(token)?;
        Ok(Identity::from(subject))
    }

    async fn verify_token_and_authorize(
        &self,
        token: &str,
        resource: &str,
        payload: &str,
    ) -> Result<Identity, AuthError> {
        let identity = self.verify_token(token).await.map_err(|e| {
            tracing::warn!(error = %e, resource = %resource, "Token verification failed");
            e
        })?;

        self.access
            .authorize(&identity.id, &identity.role_id, resource, payload)
            .await?;

        Ok(identity)
    }

    async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut identity = self.find_by_id(id).await?;

        auth::validate_password(new_password, &self.settings.password_policy)?;

        if !self.password_matches(&identity, old_password)? {
            tracing::warn!(identity_id = %id, "Password change with wrong password");
            return Err(AuthError::PasswordMismatch);
        }

        identity.password_hash = self.password_hasher.hash(new_password)?;
        self.save(identity).await?;

        tracing::info!(identity_id = %id, "Password changed");
        Ok(())
    }

    async fn change_role(&self, id: &str, role_id: &str) -> Result<Identity, AuthError> {
        let mut identity = self.find_by_id(id).await?;
        identity.role_id = role_id.to_string();
        let updated = self.save(identity).await?;

        tracing::info!(identity_id = %id, role_id = %role_id, "Role changed");
        Ok(updated)
    }

    async fn check_auth(&self, id: &str) -> Result<bool, AuthError> {
        Ok(self.repository.find_by_id(id).await?.is_some())
    }

    async fn check_auth_with_provider(&self, token: &str) -> Result<bool, AuthError> {
        let resolved = self.resolve_provider_identity(token).await?;
        self.check_auth(&resolved.uid).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Identity, AuthError> {
        self.find_by_id(id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Identity, AuthError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(username.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Identity>, AuthError> {
        Ok(self.repository.list(page).await?)
    }

    async fn update(&self, identity: Identity) -> Result<Identity, AuthError> {
        self.save(identity).await
    }

    async fn delete(&self, id: &str) -> Result<(), AuthError> {
        if self.static_identities.contains(id) {
            tracing::warn!(identity_id = %id, "Refusing to delete static identity");
            return Err(AuthError::PermissionDenied);
        }

        self.repository.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => AuthError::IdentityNotFound(id.to_string()),
            other => other.into(),
        })
    }
}
