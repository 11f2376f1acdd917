use crate::core::error::Result;
use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::Session;
use crate::shared::types::ApiResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Please sign in")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(session: Session) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(
        Some(MeResponseDto::from(session)),
        None,
        None,
    )))
}
