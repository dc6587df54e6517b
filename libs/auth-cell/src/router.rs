use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Identity and account routes. /users/admin/{target} carries both the
/// public role check (GET) and the admin-gated elevation (PUT); the PUT
/// handler runs the token-then-admin pipeline itself since the two methods
/// share one path registration.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/jwt", get(handlers::issue_jwt))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::register_user),
        )
        .route(
            "/users/admin/{target}",
            get(handlers::check_admin).put(handlers::grant_admin),
        )
        .with_state(state)
}
