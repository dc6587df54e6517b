use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use appointment_cell::models::Booking;
use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{Payment, PaymentError, RecordPaymentRequest};
use crate::services::stripe::StripeGateway;

pub struct PaymentService {
    store: StoreClient,
    gateway: StripeGateway,
}

impl PaymentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            gateway: StripeGateway::new(config),
        }
    }

    /// Create a payment intent for a booking. The charge amount is derived
    /// from the stored booking price, never from the request, so a client
    /// cannot pay less than the booked treatment costs.
    pub async fn create_intent(&self, booking_id: Uuid) -> Result<String, PaymentError> {
        let booking: Booking = self
            .store
            .find_one("bookings", &[("id", &booking_id.to_string())])
            .await?
            .ok_or(PaymentError::BookingNotFound)?;

        let amount = (booking.price * 100.0).round() as i64;
        self.gateway.create_payment_intent(amount).await
    }

    /// Store a confirmed payment and flip the referenced booking to paid.
    /// Two writes with no transaction: the payment row lands first, and the
    /// booking patch is idempotent and replayable, so a crash between the
    /// two leaves a state that re-running the patch repairs.
    pub async fn record_payment(
        &self,
        request: RecordPaymentRequest,
    ) -> Result<Payment, PaymentError> {
        let body = json!({
            "bookingId": request.booking_id,
            "email": request.email,
            "amount": request.amount,
            "transactionId": request.transaction_id,
        });

        let payment: Payment = self.store.insert_one("payments", body).await?;
        info!(
            "Payment {} recorded for booking {}",
            payment.id, request.booking_id
        );

        let patch = json!({
            "paid": true,
            "transactionId": request.transaction_id,
        });

        let touched = match self.mark_booking_paid(request.booking_id, patch.clone()).await {
            Ok(count) => count,
            Err(StoreError::Timeout) | Err(StoreError::Transport(_)) => {
                // One replay before giving up; the patch is safe to repeat.
                warn!(
                    "Booking {} paid-flag update failed transiently, retrying",
                    request.booking_id
                );
                self.mark_booking_paid(request.booking_id, patch).await?
            }
            Err(e) => return Err(e.into()),
        };

        if touched == 0 {
            warn!(
                "Payment {} references booking {} which no longer exists",
                payment.id, request.booking_id
            );
        }

        Ok(payment)
    }

    async fn mark_booking_paid(
        &self,
        booking_id: Uuid,
        patch: serde_json::Value,
    ) -> Result<u64, StoreError> {
        self.store
            .update_one("bookings", &[("id", &booking_id.to_string())], patch)
            .await
    }
}
