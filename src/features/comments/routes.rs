use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Reading is public; posting requires a session (checked by the extractor)
pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/complaints/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .with_state(service)
}
