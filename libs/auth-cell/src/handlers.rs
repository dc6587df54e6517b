use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;
use shared_utils::jwt::validate_token;

use crate::models::{CreateUserRequest, TokenIssue};
use crate::services::identity::IdentityService;

#[derive(Debug, Deserialize)]
pub struct JwtQuery {
    pub email: String,
}

/// Token issuance. Unknown users keep the legacy soft-failure shape:
/// 403 with an empty accessToken the client must check for.
#[axum::debug_handler]
pub async fn issue_jwt(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<JwtQuery>,
) -> Result<Response, AppError> {
    let service = IdentityService::new(&state);

    match service.issue_token(&query.email).await? {
        TokenIssue::Issued(token) => {
            Ok(Json(json!({ "accessToken": token })).into_response())
        }
        TokenIssue::UnknownUser => Ok((
            StatusCode::FORBIDDEN,
            Json(json!({ "accessToken": "" })),
        )
            .into_response()),
    }
}

/// Unauthenticated role check; clients use it to decide whether to show
/// the admin dashboard. It gates nothing.
#[axum::debug_handler]
pub async fn check_admin(
    State(state): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = IdentityService::new(&state);

    let is_admin = service.is_admin(&email).await?;

    Ok(Json(json!({ "isAdmin": is_admin })))
}

/// Role elevation: token verification establishes the caller's identity,
/// then the admin check authorizes the mutation, in that order.
#[axum::debug_handler]
pub async fn grant_admin(
    State(state): State<Arc<AppConfig>>,
    Path(target): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let caller = validate_token(&token, &state.access_token_secret)
        .map_err(AppError::Forbidden)?;

    let service = IdentityService::new(&state);
    service.verify_admin(&caller.email).await?;

    let user_id = Uuid::parse_str(&target)
        .map_err(|_| AppError::BadRequest(format!("Invalid user id: {}", target)))?;

    let modified = service.grant_admin(user_id).await?;
    debug!("Admin granted to {} by {}", user_id, caller.email);

    Ok(Json(json!({
        "acknowledged": true,
        "modifiedCount": modified
    })))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = IdentityService::new(&state);

    let users = service.list_users().await?;

    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn register_user(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let service = IdentityService::new(&state);

    let account = service.register_user(request).await?;

    Ok(Json(json!({
        "acknowledged": true,
        "user": account
    })))
}
