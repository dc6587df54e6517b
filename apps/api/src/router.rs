use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::router::payment_routes;
use shared_config::AppConfig;

/// Cell routers are merged rather than nested: the legacy clients expect
/// every path at the top level (/slots, /booking, /jwt, ...).
pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doctors Portal API is running!" }))
        .merge(auth_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(payment_routes(state))
}
