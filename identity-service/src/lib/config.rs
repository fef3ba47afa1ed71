use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;

use crate::domain::access::CreateAccessEntryCommand;
use crate::domain::identity::StaticIdentity;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub roles: RolesConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub static_users: Vec<StaticUserConfig>,
    #[serde(default)]
    pub acl: Vec<AccessEntryConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret; required and must not be blank.
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// `level1`, `level2` or `level3`.
    #[serde(default = "default_policy")]
    pub policy: String,
    /// `min`, `default` or `max`.
    #[serde(default)]
    pub cost: String,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            cost: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RolesConfig {
    #[serde(default = "default_role_id")]
    pub default_role_id: String,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            default_role_id: default_role_id(),
        }
    }
}

/// External identity provider settings.
///
/// `project_id` enables the unverified-claims fallback; `trusted_secret`
/// enables a primary provider verifying tokens minted with that secret and
/// `trusted_issuer`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub trusted_secret: String,
    #[serde(default)]
    pub trusted_issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StaticUserConfig {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role_id: String,
}

impl From<StaticUserConfig> for StaticIdentity {
    fn from(user: StaticUserConfig) -> Self {
        Self {
            id: user.id,
            username: user.username,
            password: user.password,
            role_id: user.role_id,
        }
    }
}

/// Seed access-control entry. The id is required so that reseeding a
/// persistent store on restart recognises entries it already holds.
#[derive(Debug, Deserialize, Clone)]
pub struct AccessEntryConfig {
    pub id: String,
    pub resource: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub user_id: String,
}

impl From<AccessEntryConfig> for CreateAccessEntryCommand {
    fn from(entry: AccessEntryConfig) -> Self {
        Self {
            id: Some(entry.id).filter(|id| !id.is_empty()),
            resource: entry.resource,
            payload: entry.payload,
            role_id: entry.role_id,
            user_id: entry.user_id,
        }
    }
}

fn default_issuer() -> String {
    "identity-service".to_string()
}

fn default_expiration_seconds() -> i64 {
    24 * 60 * 60
}

fn default_policy() -> String {
    "level1".to_string()
}

fn default_role_id() -> String {
    "default".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (IDENTITY__JWT__SECRET, IDENTITY__ROLES__DEFAULT_ROLE_ID, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // IDENTITY__JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("IDENTITY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Parse configuration from a TOML document, without files or environment.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn static_identities(&self) -> Vec<StaticIdentity> {
        self.static_users.iter().cloned().map(Into::into).collect()
    }

    pub fn access_entries(&self) -> Vec<CreateAccessEntryCommand> {
        self.acl.iter().cloned().map(Into::into).collect()
    }
}
