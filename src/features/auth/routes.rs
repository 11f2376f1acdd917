use crate::features::auth::handler;
use axum::{routing::get, Router};

/// Session routes (the handler itself requires a session)
pub fn routes() -> Router {
    Router::new().route("/api/me", get(handler::get_me))
}
