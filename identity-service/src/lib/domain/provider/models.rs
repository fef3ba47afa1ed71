use serde_json::Map;
use serde_json::Value;

/// Identity established by an identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderIdentity {
    /// Provider-side unique identifier; becomes the local identity id.
    pub uid: String,
    /// Profile claims to carry into locally issued tokens.
    pub claims: Map<String, Value>,
}

impl ProviderIdentity {
    pub fn new(uid: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            uid: uid.into(),
            claims,
        }
    }
}
