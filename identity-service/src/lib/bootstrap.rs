use std::sync::Arc;

use auth::HashCost;
use auth::TokenService;
use chrono::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::config::JwtConfig;
use crate::domain::access::AccessRepository;
use crate::domain::errors::AuthError;
use crate::domain::identity::AuthService;
use crate::domain::identity::AuthSettings;
use crate::domain::identity::IdentityRepository;
use crate::domain::identity::StaticIdentitySet;
use crate::domain::provider::IdentityProvider;
use crate::domain::provider::ProviderChain;
use crate::outbound::providers::LocalTokenProvider;
use crate::outbound::providers::UnverifiedClaimsProvider;
use crate::outbound::repositories::InMemoryAccessRepository;
use crate::outbound::repositories::InMemoryIdentityRepository;

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Authentication service over the in-memory repositories.
pub type InMemoryAuthService = AuthService<InMemoryIdentityRepository, InMemoryAccessRepository>;

/// Failure while constructing the service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Build a ready-to-use authentication service over fresh in-memory
/// repositories.
///
/// See [`build_with_repositories`].
pub async fn build(config: &Config) -> Result<InMemoryAuthService, BootstrapError> {
    build_with_repositories(
        config,
        Arc::new(InMemoryIdentityRepository::new()),
        Arc::new(InMemoryAccessRepository::new()),
        None,
    )
    .await
}

/// Build an authentication service over caller-supplied repositories.
///
/// Validates the token settings, seeds the access-control list, provisions
/// the static identities and attaches the identity provider. The provider is
/// `primary_provider` when given, otherwise the one derived from
/// `config.provider`. Safe to run against repositories that already hold the
/// seeded data.
///
/// # Errors
/// * `InvalidConfig` - Blank signing secret or token lifetime out of range
/// * `Auth(InvalidPassword | InvalidPasswordPolicy)` - A static user violates the policy
/// * `Auth(Internal)` - Repository failure while seeding
pub async fn build_with_repositories<IR, AR>(
    config: &Config,
    identities: Arc<IR>,
    access: Arc<AR>,
    primary_provider: Option<Arc<dyn IdentityProvider>>,
) -> Result<AuthService<IR, AR>, BootstrapError>
where
    IR: IdentityRepository,
    AR: AccessRepository,
{
    let lifetime = token_lifetime(&config.jwt).map_err(|e| {
        tracing::error!(error = %e, "Refusing to start");
        e
    })?;

    let tokens = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
        lifetime,
    ));

    let static_identities = Arc::new(StaticIdentitySet::new(config.static_identities()));

    let settings = AuthSettings {
        password_policy: config.password.policy.clone(),
        hash_cost: config.password.cost.parse().unwrap_or(HashCost::Default),
        default_role_id: config.roles.default_role_id.clone(),
    };

    let mut service = AuthService::new(identities, access, tokens, static_identities, settings);

    let primary = primary_provider.or_else(|| trusted_provider(config, lifetime));
    if let Some(provider) = provider_from(primary, &config.provider.project_id) {
        service = service.with_provider(provider);
    }

    let seeded = service.access().seed(config.access_entries()).await?;
    let provisioned = service.provision_static_identities().await?;

    tracing::info!(
        seeded_access_entries = seeded,
        provisioned_identities = provisioned,
        issuer = %config.jwt.issuer,
        "Identity service ready"
    );

    Ok(service)
}

/// Check the signing settings and turn the lifetime into a [`Duration`].
fn token_lifetime(jwt: &JwtConfig) -> Result<Duration, BootstrapError> {
    if jwt.secret.trim().is_empty() {
        return Err(BootstrapError::InvalidConfig(
            "jwt.secret must not be empty".to_string(),
        ));
    }

    if jwt.expiration_seconds <= 0 || jwt.expiration_seconds > MAX_TOKEN_LIFETIME_SECONDS {
        return Err(BootstrapError::InvalidConfig(format!(
            "jwt.expiration_seconds must be within 1..={}, got {}",
            MAX_TOKEN_LIFETIME_SECONDS, jwt.expiration_seconds
        )));
    }

    Duration::try_seconds(jwt.expiration_seconds).ok_or_else(|| {
        BootstrapError::InvalidConfig(format!(
            "jwt.expiration_seconds out of range: {}",
            jwt.expiration_seconds
        ))
    })
}

fn trusted_provider(config: &Config, lifetime: Duration) -> Option<Arc<dyn IdentityProvider>> {
    if config.provider.trusted_secret.is_empty() {
        return None;
    }

    let tokens = TokenService::new(
        config.provider.trusted_secret.as_bytes(),
        config.provider.trusted_issuer.clone(),
        lifetime,
    );
    Some(Arc::new(LocalTokenProvider::new(Arc::new(tokens))))
}

/// Compose the primary provider with the unverified-claims fallback.
fn provider_from(
    primary: Option<Arc<dyn IdentityProvider>>,
    project_id: &str,
) -> Option<Arc<dyn IdentityProvider>> {
    let fallback: Option<Arc<dyn IdentityProvider>> = if project_id.is_empty() {
        None
    } else {
        Some(Arc::new(UnverifiedClaimsProvider::new(project_id)))
    };

    match (primary, fallback) {
        (Some(primary), Some(fallback)) => Some(Arc::new(ProviderChain::new(primary, fallback))),
        (Some(provider), None) | (None, Some(provider)) => Some(provider),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::*;
    use serde_json::Map;

    use super::*;
    use crate::domain::access::AccessControlEntry;
    use crate::domain::access::AccessServicePort;
    use crate::domain::errors::RepositoryError;
    use crate::domain::identity::AuthServicePort;
    use crate::domain::identity::Identity;
    use crate::domain::pagination::Page;
    use crate::domain::pagination::PageRequest;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn create(&self, identity: Identity) -> Result<Identity, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, RepositoryError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, RepositoryError>;
            async fn find_by_username_and_hash(&self, username: &str, password_hash: &str) -> Result<Option<Identity>, RepositoryError>;
            async fn list(&self, page: PageRequest) -> Result<Page<Identity>, RepositoryError>;
            async fn update(&self, identity: Identity) -> Result<Identity, RepositoryError>;
            async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
        }
    }

    mock! {
        pub TestAccessRepository {}

        #[async_trait]
        impl AccessRepository for TestAccessRepository {
            async fn create(&self, entry: AccessControlEntry) -> Result<AccessControlEntry, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<AccessControlEntry>, RepositoryError>;
            async fn find_by_resource(&self, resource: &str) -> Result<Vec<AccessControlEntry>, RepositoryError>;
            async fn find_by_role_id(&self, role_id: &str) -> Result<Vec<AccessControlEntry>, RepositoryError>;
            async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<AccessControlEntry>, RepositoryError>;
            async fn find_by_payload(&self, payload: &str) -> Result<Vec<AccessControlEntry>, RepositoryError>;
            async fn find_by_user_id_and_payload(&self, user_id: &str, payload: &str) -> Result<Vec<AccessControlEntry>, RepositoryError>;
            async fn exists_for_user(&self, user_id: &str, resource: &str, payload: &str) -> Result<bool, RepositoryError>;
            async fn exists_for_role(&self, role_id: &str, resource: &str, payload: &str) -> Result<bool, RepositoryError>;
            async fn list(&self, page: PageRequest) -> Result<Page<AccessControlEntry>, RepositoryError>;
            async fn update(&self, entry: AccessControlEntry) -> Result<AccessControlEntry, RepositoryError>;
            async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
        }
    }

    const CONFIG: &str = r#"
        [jwt]
        secret = "bootstrap-secret"
        issuer = "bootstrap-test"

        [password]
        cost = "min"

        [[static_users]]
        id = "admin"
        username = "admin"
        password = "Adminpassword@123"
        role_id = "admin"

        [[acl]]
        id = "ace-1"
        resource = "v1/doc.GET"
        role_id = "admin"
    "#;

    fn config() -> Config {
        Config::from_toml(CONFIG).unwrap()
    }

    fn assert_invalid_config<T>(result: Result<T, BootstrapError>) {
        assert!(matches!(result, Err(BootstrapError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_build_seeds_and_provisions() {
        let service = build(&config()).await.unwrap();

        let admin = service.get_by_username("admin").await.unwrap();
        assert_eq!(admin.role_id, "admin");
        assert_eq!(
            service.access().list(PageRequest::default()).await.unwrap().total,
            1
        );
        assert_eq!(
            service.sign_up_with_provider("anything").await,
            Err(AuthError::ProviderNotConfigured)
        );
    }

    #[tokio::test]
    async fn test_rebuild_over_same_repositories_is_idempotent() {
        let config = config();
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let access = Arc::new(InMemoryAccessRepository::new());

        build_with_repositories(&config, Arc::clone(&identities), Arc::clone(&access), None)
            .await
            .unwrap();
        let service =
            build_with_repositories(&config, identities, access, None).await.unwrap();

        assert_eq!(service.list(PageRequest::default()).await.unwrap().total, 1);
        assert_eq!(
            service.access().list(PageRequest::default()).await.unwrap().total,
            1
        );
    }

    #[tokio::test]
    async fn test_build_over_external_repositories() {
        let mut identities = MockTestIdentityRepository::new();
        identities
            .expect_find_by_username()
            .with(eq("admin"))
            .times(1)
            .returning(|_| Ok(None));
        identities
            .expect_create()
            .withf(|identity| identity.id == "admin" && identity.role_id == "admin")
            .times(1)
            .returning(Ok);

        let mut access = MockTestAccessRepository::new();
        access
            .expect_find_by_id()
            .with(eq("ace-1"))
            .times(1)
            .returning(|_| Ok(None));
        access
            .expect_create()
            .withf(|entry| entry.id == "ace-1" && entry.resource == "v1/doc.GET")
            .times(1)
            .returning(Ok);

        let result =
            build_with_repositories(&config(), Arc::new(identities), Arc::new(access), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_blank_secret_is_rejected() {
        for secret in ["", "   "] {
            let mut config = config();
            config.jwt.secret = secret.to_string();
            assert_invalid_config(build(&config).await);
        }
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_rejected() {
        for seconds in [0, -60, MAX_TOKEN_LIFETIME_SECONDS + 1, i64::MAX / 100, i64::MAX] {
            let mut config = config();
            config.jwt.expiration_seconds = seconds;
            assert_invalid_config(build(&config).await);
        }
    }

    #[tokio::test]
    async fn test_longest_lifetime_is_accepted() {
        let mut config = config();
        config.jwt.expiration_seconds = MAX_TOKEN_LIFETIME_SECONDS;

        let service = build(&config).await.unwrap();
        assert!(service.sign_in("admin", "Adminpassword@123").await.is_ok());
    }

    #[tokio::test]
    async fn test_trusted_secret_enables_provider() {
        let mut config = config();
        config.provider.trusted_secret = "upstream-secret".to_string();
        config.provider.trusted_issuer = "upstream".to_string();

        let upstream = TokenService::new(b"upstream-secret", "upstream", Duration::hours(1));
        let token = upstream
            .issue(
                &auth::TokenSubject {
                    id: "ext-1".to_string(),
                    username: "ext-1".to_string(),
                    role_id: String::new(),
                },
                Map::new(),
            )
            .unwrap();

        let service = build(&config).await.unwrap();
        let identity = service.sign_up_with_provider(&token).await.unwrap();
        assert_eq!(identity.id, "ext-1");
    }

    #[test]
    fn test_provider_composition() {
        let config = config();
        let lifetime = Duration::hours(1);
        assert!(trusted_provider(&config, lifetime).is_none());
        assert!(provider_from(None, "").is_none());
        assert!(provider_from(None, "my-project").is_some());

        let mut trusted = config.clone();
        trusted.provider.trusted_secret = "upstream-secret".to_string();
        let primary = trusted_provider(&trusted, lifetime);
        assert!(primary.is_some());
        assert!(provider_from(primary, "").is_some());
    }
}
