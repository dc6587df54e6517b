use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Payload of the portal's access tokens. Tokens carry the owner's email
/// and a one hour expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// Verified caller identity, inserted into request extensions by the auth
/// middleware after the token checks out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
}

/// Stored user record. `role` is either "admin" or absent; it is never
/// downgraded through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}
