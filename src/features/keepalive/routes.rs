use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::keepalive::handlers;
use crate::features::keepalive::services::KeepAliveService;

pub fn routes(service: Arc<KeepAliveService>) -> Router {
    Router::new()
        .route("/api/keepalive", get(handlers::keepalive))
        .with_state(service)
}
