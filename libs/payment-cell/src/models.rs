use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;

/// Record of one confirmed external payment. Immutable once stored; its
/// creation flips the referenced booking to paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub email: String,
    pub amount: i64,
    pub transaction_id: String,
}

/// The amount is derived server-side from the stored booking; clients only
/// say which booking they are paying for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub booking_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub booking_id: Uuid,
    pub email: String,
    pub amount: i64,
    pub transaction_id: String,
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Booking not found")]
    BookingNotFound,

    #[error("Payment provider error: {0}")]
    Gateway(String),

    #[error("Payment provider timed out")]
    GatewayTimeout,

    #[error(transparent)]
    Store(#[from] StoreError),
}
