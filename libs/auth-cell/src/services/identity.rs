use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;
use shared_models::auth::UserAccount;
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use crate::models::{CreateUserRequest, TokenIssue};

pub struct IdentityService {
    store: StoreClient,
    jwt_secret: String,
}

impl IdentityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            jwt_secret: config.access_token_secret.clone(),
        }
    }

    /// Mint a one-hour token for a registered email. An unregistered email
    /// is a distinct outcome, not an error.
    pub async fn issue_token(&self, email: &str) -> Result<TokenIssue, AppError> {
        let account: Option<UserAccount> =
            self.store.find_one("users", &[("email", email)]).await?;

        match account {
            Some(_) => {
                let token = issue_token(email, &self.jwt_secret).map_err(AppError::Internal)?;
                debug!("Issued token for {}", email);
                Ok(TokenIssue::Issued(token))
            }
            None => {
                debug!("Token requested for unknown user {}", email);
                Ok(TokenIssue::UnknownUser)
            }
        }
    }

    /// Read-only role check; gates nothing by itself.
    pub async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        let account: Option<UserAccount> =
            self.store.find_one("users", &[("email", email)]).await?;
        Ok(account.map(|a| a.is_admin()).unwrap_or(false))
    }

    /// Admin gate for privileged mutations. Trusts the email only because
    /// it comes from a verified token claim.
    pub async fn verify_admin(&self, email: &str) -> Result<(), AppError> {
        if self.is_admin(email).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden("forbidden access".to_string()))
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccount>, AppError> {
        let users = self.store.find("users", &[]).await?;
        Ok(users)
    }

    /// First-registration write; role starts absent.
    pub async fn register_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<UserAccount, AppError> {
        let body = json!({
            "email": request.email,
            "name": request.name,
        });

        let account: UserAccount = self.store.insert_one("users", body).await?;
        info!("Registered user {}", account.email);
        Ok(account)
    }

    /// Idempotent role elevation; replays are harmless. A target id that
    /// matches no stored user is a 404, not a silent no-op.
    pub async fn grant_admin(&self, user_id: Uuid) -> Result<u64, AppError> {
        let touched = self
            .store
            .update_one(
                "users",
                &[("id", &user_id.to_string())],
                json!({ "role": "admin" }),
            )
            .await?;

        if touched == 0 {
            return Err(AppError::NotFound(format!("No user with id {}", user_id)));
        }

        info!("Granted admin to user {} ({} record)", user_id, touched);
        Ok(touched)
    }
}
