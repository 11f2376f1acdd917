use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::Session;
use crate::features::complaints::dtos::{
    ComplaintResponseDto, CreateComplaintDto, ListComplaintsQuery,
};
use crate::features::complaints::services::ComplaintService;
use crate::features::policy::require_session;
use crate::shared::constants::SUBMIT_SIGN_IN_NOTICE;
use crate::shared::types::{ApiResponse, Meta};

/// Browse complaints
///
/// Filters combine with AND. Newest first.
#[utoipa::path(
    get,
    path = "/api/complaints",
    params(ListComplaintsQuery),
    responses(
        (status = 200, description = "Complaints", body = ApiResponse<Vec<ComplaintResponseDto>>),
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    State(service): State<Arc<ComplaintService>>,
    Query(query): Query<ListComplaintsQuery>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponseDto>>>> {
    let (complaints, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(complaints),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(
        ("id" = Uuid, Path, description = "Complaint id")
    ),
    responses(
        (status = 200, description = "Complaint found", body = ApiResponse<ComplaintResponseDto>),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn get_complaint(
    State(service): State<Arc<ComplaintService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ComplaintResponseDto>>> {
    let complaint = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(complaint), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintDto,
    responses(
        (status = 201, description = "Complaint submitted", body = ApiResponse<ComplaintResponseDto>),
        (status = 400, description = "Validation error or no location selected"),
        (status = 401, description = "Please sign in to submit a complaint")
    ),
    tag = "complaints",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_complaint(
    session: Option<Session>,
    State(service): State<Arc<ComplaintService>>,
    AppJson(dto): AppJson<CreateComplaintDto>,
) -> Result<(StatusCode, Json<ApiResponse<ComplaintResponseDto>>)> {
    let session = require_session(session, SUBMIT_SIGN_IN_NOTICE)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let complaint = service.create(&session, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(complaint),
            Some("Complaint submitted".to_string()),
            None,
        )),
    ))
}
