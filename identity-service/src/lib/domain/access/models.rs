/// Access-control entry granting a user or a role `(resource, payload)`.
///
/// `resource` and `payload` match by exact string equality. A non-empty
/// `user_id` makes this a per-user grant, a non-empty `role_id` a per-role
/// grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlEntry {
    pub id: String,
    pub resource: String,
    pub payload: String,
    pub role_id: String,
    pub user_id: String,
}

impl AccessControlEntry {
    pub fn grants_user(&self, user_id: &str, resource: &str, payload: &str) -> bool {
        !user_id.is_empty()
            && self.user_id == user_id
            && self.resource == resource
            && self.payload == payload
    }

    pub fn grants_role(&self, role_id: &str, resource: &str, payload: &str) -> bool {
        !role_id.is_empty()
            && self.role_id == role_id
            && self.resource == resource
            && self.payload == payload
    }
}

/// Command to create an access-control entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAccessEntryCommand {
    /// Assigned from the clock when absent or empty.
    pub id: Option<String>,
    pub resource: String,
    pub payload: String,
    pub role_id: String,
    pub user_id: String,
}

impl CreateAccessEntryCommand {
    /// Grant `role_id` access to `resource` with an empty payload.
    pub fn for_role(resource: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            role_id: role_id.into(),
            ..Default::default()
        }
    }

    /// Grant `user_id` access to `resource` with an empty payload.
    pub fn for_user(resource: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }
}
