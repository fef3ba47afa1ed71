#![allow(dead_code)]

use std::sync::Arc;

use auth::Claims;
use auth::JwtHandler;
use auth::TokenService;
use auth::TokenSubject;
use chrono::Duration;
use chrono::Utc;
use identity_service::bootstrap;
use identity_service::bootstrap::InMemoryAuthService;
use identity_service::config::Config;
use identity_service::outbound::providers::LocalTokenProvider;
use identity_service::outbound::repositories::InMemoryAccessRepository;
use identity_service::outbound::repositories::InMemoryIdentityRepository;
use identity_service::provider::IdentityProvider;
use identity_service::telemetry;
use serde_json::Map;

pub const PROJECT_ID: &str = "runway-demo";
pub const PROVIDER_SECRET: &[u8] = b"provider-secret";
pub const PROVIDER_ISSUER: &str = "upstream-idp";

const CONFIG: &str = r#"
    [jwt]
    secret = "integration-secret"
    issuer = "identity-integration"
    expiration_seconds = 3600

    [password]
    policy = "level1"
    cost = "min"

    [roles]
    default_role_id = "guest"

    [[static_users]]
    id = "admin"
    username = "admin"
    password = "Adminpassword@123"
    role_id = "admin"

    [[acl]]
    id = "ace-admin-doc"
    resource = "v1/doc.GET"
    role_id = "admin"

    [[acl]]
    id = "ace-guest-list"
    resource = "v1/doc.LIST"
    role_id = "guest"

    [[acl]]
    id = "ace-u1-report"
    resource = "v1/report.GET"
    payload = "org-9"
    user_id = "u1"
"#;

pub fn init_tracing() {
    let _ = telemetry::init_tracing("identity_service=debug");
}

pub fn test_config() -> Config {
    Config::from_toml(CONFIG).expect("test config parses")
}

/// Service over fresh in-memory repositories, without a provider.
pub async fn service() -> InMemoryAuthService {
    service_with(test_config()).await
}

pub async fn service_with(config: Config) -> InMemoryAuthService {
    init_tracing();
    bootstrap::build(&config).await.expect("bootstrap succeeds")
}

/// Service whose primary provider trusts tokens from [`provider_tokens`] and
/// whose fallback accepts secure-token ID tokens for [`PROJECT_ID`].
pub async fn service_with_provider() -> InMemoryAuthService {
    init_tracing();
    let mut config = test_config();
    config.provider.project_id = PROJECT_ID.to_string();

    let primary: Arc<dyn IdentityProvider> =
        Arc::new(LocalTokenProvider::new(provider_tokens()));

    bootstrap::build_with_repositories(
        &config,
        Arc::new(InMemoryIdentityRepository::new()),
        Arc::new(InMemoryAccessRepository::new()),
        Some(primary),
    )
    .await
    .expect("bootstrap succeeds")
}

/// Token issuer standing in for an upstream identity provider.
pub fn provider_tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        PROVIDER_SECRET,
        PROVIDER_ISSUER,
        Duration::hours(1),
    ))
}

pub fn provider_token(uid: &str) -> String {
    let subject = TokenSubject {
        id: uid.to_string(),
        username: format!("{uid}@upstream"),
        role_id: String::new(),
    };
    let mut extra = Map::new();
    extra.insert("email".to_string(), format!("{uid}@example.com").into());
    provider_tokens()
        .issue(&subject, extra)
        .expect("provider token issues")
}

/// Secure-token style ID token signed with an unrelated key.
pub fn secure_token(project_id: &str, uid: &str, expires_in_seconds: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims::new()
        .with_subject(uid)
        .with_issued_at(now)
        .with_expiration(now + expires_in_seconds)
        .with_issuer(format!("https://securetoken.google.com/{project_id}"))
        .with_extra("email", format!("{uid}@example.com"))
        .with_extra("name", "Test User");

    JwtHandler::new(b"key-unknown-to-the-service")
        .encode(&claims)
        .expect("secure token encodes")
}
