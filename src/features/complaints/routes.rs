use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::complaints::handlers;
use crate::features::complaints::services::ComplaintService;

/// Browse and submit routes. Submitting requires a session (checked by the extractor).
pub fn public_routes(service: Arc<ComplaintService>) -> Router {
    Router::new()
        .route(
            "/api/complaints",
            get(handlers::list_complaints).post(handlers::create_complaint),
        )
        .route("/api/complaints/{id}", get(handlers::get_complaint))
        .with_state(service)
}

/// Authority console routes
pub fn console_routes(service: Arc<ComplaintService>) -> Router {
    Router::new()
        .route(
            "/api/console/complaints",
            get(handlers::list_console_complaints),
        )
        .route(
            "/api/console/complaints/{id}/status",
            patch(handlers::update_complaint_status),
        )
        .with_state(service)
}
