use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::identity::Identity;
use crate::domain::identity::IdentityRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Identity store kept in process memory, keyed by id.
///
/// Uniqueness of id and username is checked under the write lock, so
/// concurrent sign-ups for the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Identity>>, RepositoryError> {
        self.identities
            .read()
            .map_err(|_| RepositoryError::Storage("identity store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Identity>>, RepositoryError> {
        self.identities
            .write()
            .map_err(|_| RepositoryError::Storage("identity store lock poisoned".to_string()))
    }
}

fn username_taken(identities: &HashMap<String, Identity>, username: &str, except_id: &str) -> bool {
    identities
        .values()
        .any(|identity| identity.username == username && identity.id != except_id)
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, RepositoryError> {
        let mut identities = self.write()?;

        if identities.contains_key(&identity.id) {
            return Err(RepositoryError::Conflict(format!("id {}", identity.id)));
        }
        if username_taken(&identities, &identity.username, &identity.id) {
            return Err(RepositoryError::Conflict(format!(
                "username {}",
                identity.username
            )));
        }

        identities.insert(identity.id.clone(), identity.clone());
        tracing::debug!(identity_id = %identity.id, "Identity stored");
        Ok(identity)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, RepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, RepositoryError> {
        Ok(self
            .read()?
            .values()
            .find(|identity| identity.username == username)
            .cloned())
    }

    async fn find_by_username_and_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Identity>, RepositoryError> {
        Ok(self
            .read()?
            .values()
            .find(|identity| {
                identity.username == username && identity.password_hash == password_hash
            })
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Identity>, RepositoryError> {
        let mut all: Vec<Identity> = self.read()?.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Page::from_ordered(all, page))
    }

    async fn update(&self, identity: Identity) -> Result<Identity, RepositoryError> {
        let mut identities = self.write()?;

        if !identities.contains_key(&identity.id) {
            return Err(RepositoryError::NotFound(identity.id));
        }
        if username_taken(&identities, &identity.username, &identity.id) {
            return Err(RepositoryError::Conflict(format!(
                "username {}",
                identity.username
            )));
        }

        identities.insert(identity.id.clone(), identity.clone());
        Ok(identity)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}
