use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;
use shared_utils::jwt::validate_token;

use crate::models::{BookingError, CreateBookingRequest};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;

/// Legacy catalog backfill writes this price to every treatment.
const BACKFILL_PRICE: f64 = 99.0;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: String,
}

fn map_booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::UnknownTreatment(name) => {
            AppError::BadRequest(format!("Unknown treatment: {}", name))
        }
        BookingError::SlotNotInCatalog { slot, treatment } => {
            AppError::BadRequest(format!("Slot {} is not offered for {}", slot, treatment))
        }
        BookingError::AlreadyBooked { date } => {
            AppError::Conflict(format!("You already have a booking on {}", date))
        }
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::Store(e) => e.into(),
    }
}

#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let options = service
        .available_slots(&query.date)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(options)))
}

#[axum::debug_handler]
pub async fn get_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let names = service.specialties().await.map_err(AppError::from)?;

    Ok(Json(json!(names)))
}

#[axum::debug_handler]
pub async fn add_price(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let modified = service
        .backfill_prices(BACKFILL_PRICE)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "acknowledged": true,
        "modifiedCount": modified
    })))
}

/// Duplicate bookings come back as an acknowledged=false body rather than
/// an error status: the legacy clients render the message inline.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    match service.create_booking(request).await {
        Ok(booking) => Ok(Json(json!({
            "acknowledged": true,
            "booking": booking
        }))),
        Err(BookingError::AlreadyBooked { date }) => Ok(Json(json!({
            "acknowledged": false,
            "message": format!("You already have a booking on {}", date)
        }))),
        Err(e) => Err(map_booking_error(e)),
    }
}

/// List the caller's bookings. The email query parameter must match the
/// token's verified email claim; anything else is forbidden.
#[axum::debug_handler]
pub async fn get_owner_bookings(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<OwnerQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let user = validate_token(&token, &state.access_token_secret)
        .map_err(AppError::Forbidden)?;

    if query.email != user.email {
        return Err(AppError::Forbidden("forbidden access".to_string()));
    }

    let service = BookingService::new(&state);
    let bookings = service
        .bookings_for_owner(&user.email)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(bookings)))
}

/// Unauthenticated lookup used to populate the payment page.
#[axum::debug_handler]
pub async fn get_booking_by_id(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let booking = service.booking_by_id(id).await.map_err(map_booking_error)?;

    Ok(Json(json!(booking)))
}
