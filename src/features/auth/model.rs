use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::profiles::models::Role;

/// Resolved identity of the caller, built once per request from the bearer
/// token and the caller's profile, then passed explicitly to handlers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn has_authority_access(&self) -> bool {
        self.role.has_authority_access()
    }
}

/// Identity extracted from a validated access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub email: Option<String>,
}
