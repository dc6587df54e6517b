use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
    pub stripe_secret_key: String,
    pub stripe_base_url: String,
    pub store_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
            stripe_secret_key: "sk_test_key".to_string(),
            stripe_base_url: "http://localhost:12111".to_string(),
            // Short enough that timeout paths can be exercised against a
            // deliberately slow mock without stretching the suite.
            store_timeout_secs: 1,
        }
    }
}

impl TestConfig {
    pub fn with_store_url(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            access_token_secret: self.jwt_secret.clone(),
            stripe_secret_key: self.stripe_secret_key.clone(),
            stripe_base_url: self.stripe_base_url.clone(),
            store_timeout_secs: self.store_timeout_secs,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub role: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient("test@example.com")
    }
}

impl TestUser {
    pub fn patient(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: None,
        }
    }

    pub fn admin(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: Some("admin".to_string()),
        }
    }

    pub fn to_store_json(&self) -> serde_json::Value {
        match &self.role {
            Some(role) => json!({ "id": self.id, "email": self.email, "role": role }),
            None => json!({ "id": self.id, "email": self.email }),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(email: &str, secret: &str, exp_hours: i64) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours);

        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let payload = json!({
            "email": email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        Self::create_test_token(email, secret, -1)
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        Self::create_test_token(email, "wrong-secret", 1)
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn appointment_option(name: &str, price: f64, slots: &[&str]) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "price": price,
            "slots": slots
        })
    }

    pub fn booking(date: &str, email: &str, treatment: &str, slot: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "appointmentDate": date,
            "email": email,
            "treatmentName": treatment,
            "slot": slot,
            "price": 99.0,
            "paid": false,
            "transactionId": null
        })
    }

    pub fn doctor(name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "email": "doc@example.com",
            "specialty": specialty,
            "imageUrl": null
        })
    }

    pub fn payment(booking_id: Uuid, transaction_id: &str, amount: i64) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "bookingId": booking_id,
            "transactionId": transaction_id,
            "amount": amount,
            "email": "test@example.com"
        })
    }
}
