use async_trait::async_trait;

use super::models::AccessControlEntry;
use super::models::CreateAccessEntryCommand;
use crate::domain::errors::AuthError;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Port for access-control operations.
#[async_trait]
pub trait AccessServicePort: Send + Sync + 'static {
    /// Decide whether an identity may act on `(resource, payload)`.
    ///
    /// Static identities are always permitted; then per-user grants, then
    /// per-role grants are consulted.
    ///
    /// # Errors
    /// * `PermissionDenied` - No rule grants the action
    /// * `Internal` - Repository failure
    async fn authorize(
        &self,
        identity_id: &str,
        role_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<(), AuthError>;

    /// Create a new entry.
    ///
    /// # Errors
    /// * `InvalidAccessEntry` - Empty resource, or the id is already taken
    /// * `Internal` - Repository failure
    async fn create(&self, command: CreateAccessEntryCommand)
        -> Result<AccessControlEntry, AuthError>;

    /// # Errors
    /// * `AccessEntryNotFound` - No entry with this id
    async fn get_by_id(&self, id: &str) -> Result<AccessControlEntry, AuthError>;

    async fn get_by_resource(&self, resource: &str) -> Result<Vec<AccessControlEntry>, AuthError>;

    async fn get_by_role_id(&self, role_id: &str) -> Result<Vec<AccessControlEntry>, AuthError>;

    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<AccessControlEntry>, AuthError>;

    async fn get_by_payload(&self, payload: &str) -> Result<Vec<AccessControlEntry>, AuthError>;

    /// Entries granted directly to `user_id` for `payload`.
    async fn get_resources_for_user_and_payload(
        &self,
        user_id: &str,
        payload: &str,
    ) -> Result<Vec<AccessControlEntry>, AuthError>;

    async fn list(&self, page: PageRequest) -> Result<Page<AccessControlEntry>, AuthError>;

    /// Replace an existing entry.
    ///
    /// # Errors
    /// * `InvalidAccessEntry` - Empty id or resource
    /// * `AccessEntryNotFound` - No entry with this id
    async fn update(&self, entry: AccessControlEntry) -> Result<AccessControlEntry, AuthError>;

    /// # Errors
    /// * `AccessEntryNotFound` - No entry with this id
    async fn delete(&self, id: &str) -> Result<(), AuthError>;
}

/// Persistence operations for access-control entries.
///
/// Implementations must enforce id uniqueness atomically and report it as
/// `Conflict`; missing records on update/delete are `NotFound`.
#[async_trait]
pub trait AccessRepository: Send + Sync + 'static {
    async fn create(&self, entry: AccessControlEntry)
        -> Result<AccessControlEntry, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<AccessControlEntry>, RepositoryError>;

    async fn find_by_resource(
        &self,
        resource: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError>;

    async fn find_by_role_id(&self, role_id: &str)
        -> Result<Vec<AccessControlEntry>, RepositoryError>;

    async fn find_by_user_id(&self, user_id: &str)
        -> Result<Vec<AccessControlEntry>, RepositoryError>;

    async fn find_by_payload(&self, payload: &str)
        -> Result<Vec<AccessControlEntry>, RepositoryError>;

    async fn find_by_user_id_and_payload(
        &self,
        user_id: &str,
        payload: &str,
    ) -> Result<Vec<AccessControlEntry>, RepositoryError>;

    /// Whether a per-user grant matches exactly.
    async fn exists_for_user(
        &self,
        user_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<bool, RepositoryError>;

    /// Whether a per-role grant matches exactly.
    async fn exists_for_role(
        &self,
        role_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<bool, RepositoryError>;

    async fn list(&self, page: PageRequest) -> Result<Page<AccessControlEntry>, RepositoryError>;

    async fn update(&self, entry: AccessControlEntry)
        -> Result<AccessControlEntry, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
