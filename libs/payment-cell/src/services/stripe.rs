use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::PaymentError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    client_secret: String,
}

/// Thin client for the payment provider. Failures stay generic: the
/// provider is a black box to the rest of the system.
pub struct StripeGateway {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.stripe_base_url.clone(),
            secret_key: config.stripe_secret_key.clone(),
        }
    }

    /// Create a payment intent for an amount in minor currency units
    /// (integer cents), returning the client secret the browser confirms
    /// the charge with.
    pub async fn create_payment_intent(&self, amount: i64) -> Result<String, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        debug!("Creating payment intent for {} minor units", amount);

        let params = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::GatewayTimeout
                } else {
                    PaymentError::Gateway(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Payment provider error ({}): {}", status, error_text);
            return Err(PaymentError::Gateway(format!(
                "payment provider error ({}): {}",
                status, error_text
            )));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("unreadable provider response: {}", e)))?;

        Ok(intent.client_secret)
    }
}
