//! Route-class guards for handlers.
//!
//! Each guard pulls the session placed by the session middleware and runs it
//! through the access policy, so refusals carry the same notices everywhere:
//! - no session: 401 "Please sign in"
//! - role too low: 403 with the role notice

use crate::core::error::AppError;
use crate::features::auth::model::Session;
use crate::features::policy::{authorize, require_session, RouteClass};
use crate::shared::constants::SIGN_IN_NOTICE;
use axum::{extract::FromRequestParts, http::request::Parts};

fn guard(parts: &Parts, route: RouteClass) -> Result<Session, AppError> {
    let session = parts.extensions.get::<Session>().cloned();
    authorize(session.as_ref(), route)?;
    require_session(session, SIGN_IN_NOTICE)
}

/// Authority console: authority or admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAuthority(session): RequireAuthority) { ... }
/// ```
pub struct RequireAuthority(pub Session);

impl<S> FromRequestParts<S> for RequireAuthority
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, RouteClass::Console).map(RequireAuthority)
    }
}

/// Admin panel: admin only.
pub struct RequireAdmin(pub Session);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, RouteClass::Admin).map(RequireAdmin)
    }
}
