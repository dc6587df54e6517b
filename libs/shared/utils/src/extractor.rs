use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_database::StoreClient;
use shared_models::auth::{AuthUser, UserAccount};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Authentication middleware: a missing credential is 401, a present but
/// invalid or expired one is 403. On success the verified identity is
/// stored in the request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;

    let user = validate_token(&token, &config.access_token_secret)
        .map_err(AppError::Forbidden)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin gate. Runs after `auth_middleware`: it trusts the verified email
/// from the request extensions and checks the stored role.
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = extract_user(&request)?;

    let store = StoreClient::new(&config);
    let account: Option<UserAccount> = store
        .find_one("users", &[("email", &user.email)])
        .await
        .map_err(AppError::from)?;

    match account {
        Some(account) if account.is_admin() => Ok(next.run(request).await),
        _ => Err(AppError::Forbidden("forbidden access".to_string())),
    }
}

/// Extract the raw bearer token from a header map. Missing header is a
/// 401, an unreadable one a 403.
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Forbidden("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Pull the verified identity out of the request extensions.
pub fn extract_user<B>(request: &Request<B>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}
