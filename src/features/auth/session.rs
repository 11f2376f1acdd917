use std::sync::Arc;

use super::model::{Session, VerifiedToken};
use super::validator::JwtValidator;
use crate::core::error::Result;
use crate::features::profiles::ProfileService;

/// Turns a bearer token into the explicit per-request session
pub struct SessionResolver {
    validator: JwtValidator,
    profiles: Arc<ProfileService>,
}

impl SessionResolver {
    pub fn new(validator: JwtValidator, profiles: Arc<ProfileService>) -> Self {
        Self {
            validator,
            profiles,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<Session> {
        let verified = self.validator.validate_token(token).await?;
        self.session_for(verified).await
    }

    async fn session_for(&self, token: VerifiedToken) -> Result<Session> {
        let (role, full_name) = self.profiles.role_of(token.user_id).await?;

        Ok(Session {
            user_id: token.user_id,
            email: token.email,
            full_name,
            role,
        })
    }
}
