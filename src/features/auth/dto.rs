use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::Session;
use crate::features::policy::{evaluate, RouteClass};
use crate::features::profiles::models::Role;

/// DTO for /api/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    pub can_submit: bool,
    pub can_triage: bool,
    pub can_manage_categories: bool,
}

impl From<Session> for MeResponseDto {
    fn from(session: Session) -> Self {
        let allowed = |route| evaluate(Some(&session), route).is_allowed();
        let can_submit = allowed(RouteClass::Submit);
        let can_triage = allowed(RouteClass::Console);
        let can_manage_categories = allowed(RouteClass::Admin);

        Self {
            user_id: session.user_id,
            email: session.email,
            full_name: session.full_name,
            role: session.role,
            can_submit,
            can_triage,
            can_manage_categories,
        }
    }
}
