use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Slot availability and booking-ledger routes. Paths are top-level for
/// legacy client compatibility. GET /booking authenticates in the handler
/// because it shares a path with the public POST.
pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots", get(handlers::get_slots))
        .route("/appointmentSpecialty", get(handlers::get_specialties))
        .route("/addPrice", get(handlers::add_price))
        .route(
            "/booking",
            get(handlers::get_owner_bookings).post(handlers::create_booking),
        )
        .route("/booking/{id}", get(handlers::get_booking_by_id))
        .with_state(state)
}
