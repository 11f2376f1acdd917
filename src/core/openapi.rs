use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::complaints::{
    dtos as complaints_dtos, handlers as complaints_handlers, models as complaints_models,
};
use crate::features::keepalive::{dtos as keepalive_dtos, handlers as keepalive_handlers};
use crate::features::policy::{self, dto as policy_dto};
use crate::features::profiles::models::Role;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        keepalive_handlers::keepalive,
        // Auth
        auth::handler::get_me,
        // Policy (public)
        policy::handler::check_access,
        policy::handler::get_lifecycle,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::delete_category,
        // Complaints
        complaints_handlers::list_complaints,
        complaints_handlers::get_complaint,
        complaints_handlers::create_complaint,
        // Console
        complaints_handlers::list_console_complaints,
        complaints_handlers::update_complaint_status,
        // Comments
        comments_handlers::list_comments,
        comments_handlers::create_comment,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Role,
            keepalive_dtos::KeepAliveStatus,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::Session,
            ApiResponse<auth::dto::MeResponseDto>,
            // Policy
            policy::RouteClass,
            policy::TransitionMode,
            policy_dto::AccessDecisionDto,
            policy_dto::StatusInfoDto,
            policy_dto::LifecycleDto,
            ApiResponse<policy_dto::AccessDecisionDto>,
            ApiResponse<policy_dto::LifecycleDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::DeleteCategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::DeleteCategoryResponseDto>,
            // Complaints
            complaints_models::ComplaintStatus,
            complaints_models::Priority,
            complaints_dtos::ComplaintResponseDto,
            complaints_dtos::CreateComplaintDto,
            complaints_dtos::UpdateComplaintStatusDto,
            ApiResponse<Vec<complaints_dtos::ComplaintResponseDto>>,
            ApiResponse<complaints_dtos::ComplaintResponseDto>,
            // Comments
            comments_dtos::CommentResponseDto,
            comments_dtos::CreateCommentDto,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
        )
    ),
    tags(
        (name = "health", description = "Liveness and database keep-alive"),
        (name = "auth", description = "Current session"),
        (name = "policy", description = "Access policy and complaint lifecycle (public)"),
        (name = "categories", description = "Complaint categories (admin manages)"),
        (name = "complaints", description = "Browse and submit complaints"),
        (name = "console", description = "Authority triage console"),
        (name = "comments", description = "Comment threads on complaints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CivicLens API",
        version = "0.1.0",
        description = "API documentation for CivicLens",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
