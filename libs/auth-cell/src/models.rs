use serde::{Deserialize, Serialize};

/// Outcome of token issuance. Unknown users are a distinct variant, not an
/// empty token, so callers cannot mistake the soft failure for a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenIssue {
    Issued(String),
    UnknownUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
