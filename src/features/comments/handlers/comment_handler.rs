use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::Session;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::services::CommentService;
use crate::features::policy::require_session;
use crate::shared::constants::COMMENT_SIGN_IN_NOTICE;
use crate::shared::types::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/complaints/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Complaint id")
    ),
    responses(
        (status = 200, description = "Comment thread, oldest first", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 404, description = "Complaint not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let comments = service.list(id).await?;
    Ok(Json(ApiResponse::success(Some(comments), None, None)))
}

/// Append a comment; responds with the whole thread
#[utoipa::path(
    post,
    path = "/api/complaints/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Complaint id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Please sign in to comment"),
        (status = 404, description = "Complaint not found")
    ),
    tag = "comments",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_comment(
    session: Option<Session>,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CommentResponseDto>>>)> {
    let session = require_session(session, COMMENT_SIGN_IN_NOTICE)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let thread = service.create(&session, id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(thread),
            Some("Comment added".to_string()),
            None,
        )),
    ))
}
