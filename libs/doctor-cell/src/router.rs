use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{admin_middleware, auth_middleware};

use crate::handlers;

/// Roster routes are all privileged. The capability pipeline is explicit:
/// auth_middleware is layered outermost so it runs first and establishes
/// identity, then admin_middleware authorizes the action.
pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/doctors",
            get(handlers::list_doctors).post(handlers::add_doctor),
        )
        .route("/doctors/{id}", delete(handlers::remove_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
