use std::collections::HashMap;

use auth::TokenSubject;

/// Authenticatable principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    /// PHC digest; empty for identities created through a provider.
    pub password_hash: String,
    pub role_id: String,
}

impl Identity {
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }

    pub(crate) fn token_subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.id.clone(),
            username: self.username.clone(),
            role_id: self.role_id.clone(),
        }
    }
}

impl From<TokenSubject> for Identity {
    fn from(subject: TokenSubject) -> Self {
        Self {
            id: subject.id,
            username: subject.username,
            password_hash: String::new(),
            role_id: subject.role_id,
        }
    }
}

/// Signed token handed back after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub jwt: String,
    pub id: String,
    pub user_id: String,
    pub role_id: String,
}

impl Token {
    pub(crate) fn for_identity(jwt: String, identity: &Identity) -> Self {
        Self {
            jwt,
            id: identity.id.clone(),
            user_id: identity.id.clone(),
            role_id: identity.role_id.clone(),
        }
    }
}

/// Command to register a local identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpCommand {
    /// Assigned from the clock when absent.
    pub id: Option<String>,
    pub username: String,
    /// Plain text password (will be hashed by service)
    pub password: String,
    /// Default role is assigned when absent or empty.
    pub role_id: Option<String>,
}

impl SignUpCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: password.into(),
            role_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }
}

/// Pre-provisioned identity from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role_id: String,
}

impl From<&StaticIdentity> for SignUpCommand {
    fn from(identity: &StaticIdentity) -> Self {
        Self {
            id: Some(identity.id.clone()),
            username: identity.username.clone(),
            password: identity.password.clone(),
            role_id: Some(identity.role_id.clone()).filter(|role| !role.is_empty()),
        }
    }
}

/// Immutable snapshot of static identities, indexed by id.
///
/// Built once at startup and shared read-only. Members cannot be deleted and
/// bypass access control.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentitySet {
    by_id: HashMap<String, StaticIdentity>,
}

impl StaticIdentitySet {
    /// Index identities by id. A later entry with a repeated id replaces the
    /// earlier one.
    pub fn new(identities: impl IntoIterator<Item = StaticIdentity>) -> Self {
        let by_id = identities
            .into_iter()
            .map(|identity| (identity.id.clone(), identity))
            .collect();
        Self { by_id }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&StaticIdentity> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Members ordered by id.
    pub fn identities(&self) -> Vec<&StaticIdentity> {
        let mut identities: Vec<&StaticIdentity> = self.by_id.values().collect();
        identities.sort_by(|a, b| a.id.cmp(&b.id));
        identities
    }
}
