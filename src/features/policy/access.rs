//! Route-level access policy, consulted by every guarded endpoint and service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::auth::model::Session;
use crate::shared::constants::{
    ADMIN_REQUIRED_NOTICE, AUTHORITY_REQUIRED_NOTICE, HOME_PATH, SIGN_IN_NOTICE, SIGN_IN_PATH,
    SUBMIT_SIGN_IN_NOTICE,
};

/// Classes of views, each with one entry condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Home, browse list, complaint detail
    Browse,
    /// Submitting complaints and comments
    Submit,
    /// Authority triage console
    Console,
    /// Category management
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// No session: send the caller to sign in
    SignInRequired { notice: &'static str },
    /// Session present but role insufficient: send the caller home with a notice
    Denied { notice: &'static str },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::SignInRequired { .. } => Some(SIGN_IN_PATH),
            AccessDecision::Denied { .. } => Some(HOME_PATH),
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::SignInRequired { notice } | AccessDecision::Denied { notice } => {
                Some(notice)
            }
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::SignInRequired { notice } => {
                Err(AppError::Unauthorized(notice.to_string()))
            }
            AccessDecision::Denied { notice } => Err(AppError::Forbidden(notice.to_string())),
        }
    }
}

pub fn evaluate(session: Option<&Session>, route: RouteClass) -> AccessDecision {
    if route == RouteClass::Browse {
        return AccessDecision::Allow;
    }

    let Some(session) = session else {
        let notice = match route {
            RouteClass::Submit => SUBMIT_SIGN_IN_NOTICE,
            _ => SIGN_IN_NOTICE,
        };
        return AccessDecision::SignInRequired { notice };
    };

    match route {
        RouteClass::Browse | RouteClass::Submit => AccessDecision::Allow,
        RouteClass::Console if session.has_authority_access() => AccessDecision::Allow,
        RouteClass::Console => AccessDecision::Denied {
            notice: AUTHORITY_REQUIRED_NOTICE,
        },
        RouteClass::Admin if session.is_admin() => AccessDecision::Allow,
        RouteClass::Admin => AccessDecision::Denied {
            notice: ADMIN_REQUIRED_NOTICE,
        },
    }
}

/// Evaluate and convert a refusal into the matching error
pub fn authorize(session: Option<&Session>, route: RouteClass) -> Result<(), AppError> {
    let decision = evaluate(session, route);
    if !decision.is_allowed() {
        tracing::warn!(
            user_id = ?session.map(|s| s.user_id),
            route = ?route,
            "Access refused"
        );
    }
    decision.into_result()
}

/// Take the session out of an optional one, refusing anonymous callers with `notice`
pub fn require_session(
    session: Option<Session>,
    notice: &'static str,
) -> Result<Session, AppError> {
    session.ok_or_else(|| {
        tracing::warn!(notice, "Anonymous caller refused");
        AppError::Unauthorized(notice.to_string())
    })
}
