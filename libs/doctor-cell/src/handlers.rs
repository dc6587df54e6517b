use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, RosterError};
use crate::services::roster::RosterService;

fn map_roster_error(err: RosterError) -> AppError {
    match err {
        RosterError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        RosterError::Store(e) => e.into(),
    }
}

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RosterService::new(&state);

    let doctor = service.add_doctor(request).await.map_err(map_roster_error)?;

    Ok(Json(json!({
        "acknowledged": true,
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = RosterService::new(&state);

    let doctors = service.list_doctors().await.map_err(map_roster_error)?;

    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn remove_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RosterService::new(&state);

    service.remove_doctor(id).await.map_err(map_roster_error)?;

    Ok(Json(json!({
        "acknowledged": true,
        "deletedCount": 1
    })))
}
