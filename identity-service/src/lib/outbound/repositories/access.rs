use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use async_trait::async_trait;

use crate::domain::access::AccessControlEntry;
use crate::domain::access::AccessRepository;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Access-control entries kept in process memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    entries: RwLock<HashMap<String, AccessControlEntry>>,
}

impl InMemoryAccessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, AccessControlEntry>>, RepositoryError> {
        self.entries
            .read()
            .map_err(|_| RepositoryError::Storage("access store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, AccessControlEntry>>, RepositoryError> {
        self.entries
            .write()
            .map_err(|_| RepositoryError::Storage("access store lock poisoned".to_string()))
    }

    /// Entries matching `predicate`, ordered by id.
    fn filter<F>(&self, predicate: F) -> Result<Vec<AccessControlEntry>, RepositoryError>
    where
        F: Fn(&AccessControlEntry) -> bool,
    {
        let mut matched: Vec<AccessControlEntry> = self
            .read()?
            .values()
            .filter(|&entry| predicate(entry))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matched)
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn create(
        &self,
        entry: AccessControlEntry,
    ) -> Result<AccessControlEntry, RepositoryError> {
        let mut entries = self.write()?;
        if entries.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict(format!("id {}", entry.id)));
        }
        entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AccessControlEntry>, RepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_resource(
        &self,
        resource: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError> {
        self.filter(|entry| entry.resource == resource)
    }

    async fn find_by_role_id(
        &self,
        role_id: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError> {
        self.filter(|entry| entry.role_id == role_id)
    }

    async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError> {
        self.filter(|entry| entry.user_id == user_id)
    }

    async fn find_by_payload(
        &self,
        payload: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError> {
        self.filter(|entry| entry.payload == payload)
    }

    async fn find_by_user_id_and_payload(
        &self,
        user_id: &str,
        payload: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError> {
        self.filter(|entry| entry.user_id == user_id && entry.payload == payload)
    }

    async fn exists_for_user(
        &self,
        user_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .read()?
            .values()
            .any(|entry| entry.grants_user(user_id, resource, payload)))
    }

    async fn exists_for_role(
        &self,
        role_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .read()?
            .values()
            .any(|entry| entry.grants_role(role_id, resource, payload)))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<AccessControlEntry>, RepositoryError> {
        Ok(Page::from_ordered(self.filter(|_| true)?, page))
    }

    async fn update(
        &self,
        entry: AccessControlEntry,
    ) -> Result<AccessControlEntry, RepositoryError> {
        let mut entries = self.write()?;
        match entries.get_mut(&entry.id) {
            Some(existing) => {
                *existing = entry.clone();
                Ok(entry)
            }
            None => Err(RepositoryError::NotFound(entry.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}
