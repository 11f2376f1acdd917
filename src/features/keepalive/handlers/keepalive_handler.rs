use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::features::keepalive::dtos::KeepAliveStatus;
use crate::features::keepalive::services::KeepAliveService;

/// Probe the database with a single-row read
#[utoipa::path(
    get,
    path = "/api/keepalive",
    responses(
        (status = 200, description = "Database reachable", body = KeepAliveStatus),
        (status = 500, description = "Probe failed", body = KeepAliveStatus)
    ),
    tag = "health"
)]
pub async fn keepalive(
    State(service): State<Arc<KeepAliveService>>,
) -> (StatusCode, Json<KeepAliveStatus>) {
    let status = service.ping().await;
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(status))
}
