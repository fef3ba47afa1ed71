use std::sync::Arc;

use async_trait::async_trait;

use super::models::AccessControlEntry;
use super::models::CreateAccessEntryCommand;
use super::ports::AccessRepository;
use super::ports::AccessServicePort;
use crate::domain::errors::AuthError;
use crate::domain::errors::RepositoryError;
use crate::domain::identity::models::StaticIdentitySet;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::timestamp_id;

/// Access-control decision engine and entry administration.
///
/// Only reads entries while deciding; entries are created administratively.
pub struct AccessService<AR>
where
    AR: AccessRepository,
{
    repository: Arc<AR>,
    static_identities: Arc<StaticIdentitySet>,
}

impl<AR> AccessService<AR>
where
    AR: AccessRepository,
{
    /// Create an access service.
    ///
    /// # Arguments
    /// * `repository` - Entry persistence implementation
    /// * `static_identities` - Identities that bypass every rule
    pub fn new(repository: Arc<AR>, static_identities: Arc<StaticIdentitySet>) -> Self {
        Self {
            repository,
            static_identities,
        }
    }

    /// Create configured entries that are not stored yet.
    ///
    /// Seed entries are matched by id, so every entry must carry one; entries
    /// without an id or with an empty resource are skipped with a warning.
    /// Entries whose id already exists are skipped, which keeps reseeding a
    /// persistent store on every start free of duplicates.
    ///
    /// # Returns
    /// Number of entries created
    ///
    /// # Errors
    /// * `Internal` - Repository failure
    pub async fn seed(&self, entries: Vec<CreateAccessEntryCommand>) -> Result<usize, AuthError> {
        let mut created = 0;
        for command in entries {
            let Some(id) = command.id.clone().filter(|id| !id.is_empty()) else {
                tracing::warn!(resource = %command.resource, "Skipping seed access entry without id");
                continue;
            };

            if command.resource.is_empty() {
                tracing::warn!(entry_id = %id, "Skipping seed access entry with empty resource");
                continue;
            }

            if self.repository.find_by_id(&id).await?.is_some() {
                tracing::debug!(entry_id = %id, "Seed access entry already present");
                continue;
            }

            match self.create(command).await {
                Ok(_) => created += 1,
                // Created concurrently between the lookup and the insert.
                Err(AuthError::InvalidAccessEntry(_)) => {
                    tracing::debug!(entry_id = %id, "Seed access entry already present");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    fn entry_not_found(id: &str, err: RepositoryError) -> AuthError {
        match err {
            RepositoryError::NotFound(_) => AuthError::AccessEntryNotFound(id.to_string()),
            other => other.into(),
        }
    }
}

#[async_trait]
impl<AR> AccessServicePort for AccessService<AR>
where
    AR: AccessRepository,
{
    async fn authorize(
        &self,
        identity_id: &str,
        role_id: &str,
        resource: &str,
        payload: &str,
    ) -> Result<(), AuthError> {
        if !self.static_identities.is_empty() && self.static_identities.contains(identity_id) {
            return Ok(());
        }

        if !identity_id.is_empty()
            && self
                .repository
                .exists_for_user(identity_id, resource, payload)
                .await?
        {
            return Ok(());
        }

        if !role_id.is_empty()
            && self
                .repository
                .exists_for_role(role_id, resource, payload)
                .await?
        {
            return Ok(());
        }

        tracing::warn!(
            identity_id = %identity_id,
            role_id = %role_id,
            resource = %resource,
            payload = %payload,
            "Permission denied"
        );
        Err(AuthError::PermissionDenied)
    }

    async fn create(
        &self,
        command: CreateAccessEntryCommand,
    ) -> Result<AccessControlEntry, AuthError> {
        if command.resource.is_empty() {
            return Err(AuthError::InvalidAccessEntry(
                "resource must not be empty".to_string(),
            ));
        }

        let entry = AccessControlEntry {
            id: command
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(timestamp_id),
            resource: command.resource,
            payload: command.payload,
            role_id: command.role_id,
            user_id: command.user_id,
        };
        let id = entry.id.clone();

        self.repository.create(entry).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AuthError::InvalidAccessEntry(format!("id {} already exists", id))
            }
            other => other.into(),
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<AccessControlEntry, AuthError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::AccessEntryNotFound(id.to_string()))
    }

    async fn get_by_resource(&self, resource: &str) -> Result<Vec<AccessControlEntry>, AuthError> {
        Ok(self.repository.find_by_resource(resource).await?)
    }

    async fn get_by_role_id(&self, role_id: &str) -> Result<Vec<AccessControlEntry>, AuthError> {
        Ok(self.repository.find_by_role_id(role_id).await?)
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<AccessControlEntry>, AuthError> {
        Ok(self.repository.find_by_user_id(user_id).await?)
    }

    async fn get_by_payload(&self, payload: &str) -> Result<Vec<AccessControlEntry>, AuthError> {
        Ok(self.repository.find_by_payload(payload).await?)
    }

    async fn get_resources_for_user_and_payload(
        &self,
        user_id: &str,
        payload: &str,
    ) -> Result<Vec<AccessControlEntry>, AuthError> {
        Ok(self
            .repository
            .find_by_user_id_and_payload(user_id, payload)
            .await?)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<AccessControlEntry>, AuthError> {
        Ok(self.repository.list(page).await?)
    }

    async fn update(&self, entry: AccessControlEntry) -> Result<AccessControlEntry, AuthError> {
        if entry.id.is_empty() {
            return Err(AuthError::InvalidAccessEntry(
                "id must not be empty".to_string(),
            ));
        }
        if entry.resource.is_empty() {
            return Err(AuthError::InvalidAccessEntry(
                "resource must not be empty".to_string(),
            ));
        }

        let id = entry.id.clone();
        self.repository
            .update(entry)
            .await
            .map_err(|e| Self::entry_not_found(&id, e))
    }

    async fn delete(&self, id: &str) -> Result<(), AuthError> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| Self::entry_not_found(id, e))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::identity::models::StaticIdentity;

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

    fn statics() -> Arc<StaticIdentitySet> {
        Arc::new(StaticIdentitySet::new(vec![StaticIdentity {
            id: "admin".to_string(),
            username: "admin".to_string(),
            password: "Adminpassword@123".to_string(),
            role_id: "admin".to_string(),
        }]))
    }

    fn service(repository: MockTestAccessRepository) -> AccessService<MockTestAccessRepository> {
        AccessService::new(Arc::new(repository), statics())
    }

    #[tokio::test]
    async fn test_static_identity_bypasses_rules() {
        let mut repository = MockTestAccessRepository::new();
        repository.expect_exists_for_user().times(0);
        repository.expect_exists_for_role().times(0);

        let result = service(repository)
            .authorize("admin", "", "v1/payment.POST", "")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_user_grant_short_circuits_role_check() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_exists_for_user()
            .with(eq("u1"), eq("v1/doc.GET"), eq(""))
            .times(1)
            .returning(|_, _, _| Ok(true));
        repository.expect_exists_for_role().times(0);

        let result = service(repository)
            .authorize("u1", "guest", "v1/doc.GET", "")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_role_grant() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_exists_for_user()
            .times(1)
            .returning(|_, _, _| Ok(false));
        repository
            .expect_exists_for_role()
            .with(eq("admin"), eq("v1/doc.GET"), eq(""))
            .times(1)
            .returning(|_, _, _| Ok(true));

        let result = service(repository)
            .authorize("u1", "admin", "v1/doc.GET", "")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_no_match_denies() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_exists_for_user()
            .times(1)
            .returning(|_, _, _| Ok(false));
        repository
            .expect_exists_for_role()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let result = service(repository)
            .authorize("u1", "guest", "v1/doc.GET", "")
            .await;
        assert_eq!(result, Err(AuthError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_empty_role_skips_role_check() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_exists_for_user()
            .times(1)
            .returning(|_, _, _| Ok(false));
        repository.expect_exists_for_role().times(0);

        let result = service(repository).authorize("u1", "", "v1/doc.GET", "").await;
        assert_eq!(result, Err(AuthError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_repository_failure_is_internal() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_exists_for_user()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::Storage("disk".to_string())));

        let result = service(repository)
            .authorize("u1", "guest", "v1/doc.GET", "")
            .await;
        assert_eq!(result, Err(AuthError::Internal));
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_create()
            .withf(|entry| !entry.id.is_empty() && entry.id.chars().all(|c| c.is_ascii_digit()))
            .times(1)
            .returning(|entry| Ok(entry));

        let entry = service(repository)
            .create(CreateAccessEntryCommand::for_role("v1/doc.GET", "admin"))
            .await
            .unwrap();
        assert_eq!(entry.role_id, "admin");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_resource() {
        let mut repository = MockTestAccessRepository::new();
        repository.expect_create().times(0);

        let result = service(repository)
            .create(CreateAccessEntryCommand::for_role("", "admin"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidAccessEntry(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_entry() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_update()
            .times(1)
            .returning(|entry| Err(RepositoryError::NotFound(entry.id)));

        let result = service(repository)
            .update(AccessControlEntry {
                id: "404".to_string(),
                resource: "v1/doc.GET".to_string(),
                payload: String::new(),
                role_id: "admin".to_string(),
                user_id: String::new(),
            })
            .await;
        assert_eq!(result, Err(AuthError::AccessEntryNotFound("404".to_string())));
    }

    #[tokio::test]
    async fn test_seed_skips_existing_entries() {
        let mut repository = MockTestAccessRepository::new();
        repository
            .expect_find_by_id()
            .returning(|id| {
                Ok((id == "100").then(|| AccessControlEntry {
                    id: id.to_string(),
                    resource: "v1/course.GET".to_string(),
                    payload: String::new(),
                    role_id: "default".to_string(),
                    user_id: String::new(),
                }))
            });
        repository
            .expect_create()
            .withf(|entry| entry.id == "101")
            .times(1)
            .returning(Ok);

        let created = service(repository)
            .seed(vec![
                CreateAccessEntryCommand::for_role("v1/course.GET", "default").with_id("100"),
                CreateAccessEntryCommand::for_role("v1/course.POST", "admin").with_id("101"),
            ])
            .await
            .unwrap();
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_seed_skips_entries_without_id_or_resource() {
        let mut repository = MockTestAccessRepository::new();
        repository.expect_find_by_id().times(0);
        repository.expect_create().times(0);

        let created = service(repository)
            .seed(vec![
                CreateAccessEntryCommand::for_role("v1/course.GET", "default"),
                CreateAccessEntryCommand::for_role("v1/course.GET", "default").with_id(""),
                CreateAccessEntryCommand::for_role("", "admin").with_id("102"),
            ])
            .await
            .unwrap();
        assert_eq!(created, 0);
    }

    #[tokio::test]
    async fn test_seed_tolerates_concurrent_insert() {
        let mut repository = MockTestAccessRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|entry| Err(RepositoryError::Conflict(entry.id)));

        let created = service(repository)
            .seed(vec![
                CreateAccessEntryCommand::for_role("v1/course.GET", "default").with_id("100"),
            ])
            .await
            .unwrap();
        assert_eq!(created, 0);
    }
}
