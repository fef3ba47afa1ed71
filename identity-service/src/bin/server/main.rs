use identity_service::bootstrap;
use identity_service::config::Config;
use identity_service::telemetry;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_tracing("identity_service=debug")?;

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        issuer = %config.jwt.issuer,
        expiration_seconds = config.jwt.expiration_seconds,
        password_policy = %config.password.policy,
        default_role_id = %config.roles.default_role_id,
        static_users = config.static_users.len(),
        acl_entries = config.acl.len(),
        provider_project = %config.provider.project_id,
        "Configuration loaded"
    );

    let service = bootstrap::build(&config).await?;

    for identity in service.static_identities().identities() {
        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            role_id = %identity.role_id,
            "Static identity available"
        );
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    Ok(())
}
