use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role attached to a profile; gates which views and mutations an actor may reach
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Authority,
    Admin,
}

impl Role {
    /// Authority console access (authority or admin)
    pub fn has_authority_access(self) -> bool {
        matches!(self, Role::Authority | Role::Admin)
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Authority => write!(f, "authority"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Database model for profile. The id is the identity provider's user id.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
