use axum::{routing::get, Router};

use super::{handler, Lifecycle};

/// Public policy routes
pub fn routes(lifecycle: Lifecycle) -> Router {
    Router::new()
        .route("/api/access/{route}", get(handler::check_access))
        .route("/api/lifecycle", get(handler::get_lifecycle))
        .with_state(lifecycle)
}
