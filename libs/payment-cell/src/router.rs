use std::sync::Arc;

use axum::{
    routing::post,
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn payment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/payments", post(handlers::record_payment))
        .with_state(state)
}
