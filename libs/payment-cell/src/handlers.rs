use std::sync::Arc;

use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    CreatePaymentIntentRequest, PaymentError, PaymentIntentResponse, RecordPaymentRequest,
};
use crate::services::payment::PaymentService;

fn map_payment_error(err: PaymentError) -> AppError {
    match err {
        PaymentError::BookingNotFound => AppError::NotFound("Booking not found".to_string()),
        PaymentError::Gateway(msg) => AppError::ExternalService(msg),
        PaymentError::GatewayTimeout => {
            AppError::Timeout("payment provider timed out".to_string())
        }
        PaymentError::Store(e) => e.into(),
    }
}

#[axum::debug_handler]
pub async fn create_payment_intent(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PaymentService::new(&state);

    let client_secret = service
        .create_intent(request.booking_id)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!(PaymentIntentResponse { client_secret })))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PaymentService::new(&state);

    let payment = service
        .record_payment(request)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({
        "acknowledged": true,
        "payment": payment
    })))
}
