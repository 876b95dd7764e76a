use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the external users service.
/// The id is the opaque owner key for all row-level authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}
