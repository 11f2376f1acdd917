use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AccessDecision, Lifecycle, RouteClass, TransitionMode};
use crate::features::complaints::models::ComplaintStatus;

/// Outcome of evaluating the access policy for the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessDecisionDto {
    pub route: RouteClass,
    pub allowed: bool,
    /// Where a front-end should send the caller when not allowed
    pub redirect_to: Option<String>,
    pub notice: Option<String>,
}

impl AccessDecisionDto {
    pub fn new(route: RouteClass, decision: AccessDecision) -> Self {
        Self {
            route,
            allowed: decision.is_allowed(),
            redirect_to: decision.redirect_to().map(str::to_string),
            notice: decision.notice().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusInfoDto {
    pub status: ComplaintStatus,
    pub label: String,
    pub terminal: bool,
    /// Statuses reachable from this one under the active transition mode
    pub next: Vec<ComplaintStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LifecycleDto {
    pub mode: TransitionMode,
    pub statuses: Vec<StatusInfoDto>,
}

impl From<Lifecycle> for LifecycleDto {
    fn from(lifecycle: Lifecycle) -> Self {
        let statuses = ComplaintStatus::ALL
            .into_iter()
            .map(|status| StatusInfoDto {
                status,
                label: status.label().to_string(),
                terminal: status.is_terminal(),
                next: lifecycle.next_statuses(status),
            })
            .collect();

        Self {
            mode: lifecycle.mode(),
            statuses,
        }
    }
}
