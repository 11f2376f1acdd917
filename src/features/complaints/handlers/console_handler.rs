use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAuthority;
use crate::features::complaints::dtos::{ComplaintResponseDto, UpdateComplaintStatusDto};
use crate::features::complaints::services::ComplaintService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Triage list: complaints that are not RESOLVED
#[utoipa::path(
    get,
    path = "/api/console/complaints",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Unresolved complaints", body = ApiResponse<Vec<ComplaintResponseDto>>),
        (status = 401, description = "Please sign in"),
        (status = 403, description = "Authority role required")
    ),
    tag = "console",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_console_complaints(
    RequireAuthority(session): RequireAuthority,
    State(service): State<Arc<ComplaintService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponseDto>>>> {
    let (complaints, total) = service.list_console(&session, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(complaints),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/console/complaints/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Complaint id")
    ),
    request_body = UpdateComplaintStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ComplaintResponseDto>),
        (status = 401, description = "Please sign in"),
        (status = 403, description = "Authority role required"),
        (status = 404, description = "Complaint not found"),
        (status = 409, description = "Transition not allowed or version mismatch")
    ),
    tag = "console",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_complaint_status(
    RequireAuthority(session): RequireAuthority,
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateComplaintStatusDto>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let complaint = service.set_status(&session, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(complaint),
        Some("Status updated".to_string()),
        None,
    )))
}
