//! Complaint lifecycle: which statuses exist and which moves between them are allowed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::features::complaints::models::ComplaintStatus;

/// How strictly status changes are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Any status may be set from any status
    #[default]
    Open,
    /// Forward along NEW → ACKNOWLEDGED → IN_PROGRESS → RESOLVED, REJECTED from any
    /// non-terminal status, terminal statuses locked
    ForwardOnly,
}

impl FromStr for TransitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(TransitionMode::Open),
            "forward_only" | "forward-only" | "strict" => Ok(TransitionMode::ForwardOnly),
            other => Err(format!(
                "STATUS_TRANSITIONS must be 'open' or 'forward_only', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Complaint is {0} and its status can no longer change")]
    Terminal(ComplaintStatus),

    #[error("Cannot move complaint back from {from} to {to}")]
    Backward {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    mode: TransitionMode,
}

impl Lifecycle {
    pub fn new(mode: TransitionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    /// Check a requested move. Setting the current status again is always accepted.
    pub fn check(&self, from: ComplaintStatus, to: ComplaintStatus) -> Result<(), TransitionError> {
        if from == to || self.mode == TransitionMode::Open {
            return Ok(());
        }

        if from.is_terminal() {
            return Err(TransitionError::Terminal(from));
        }

        match (from.stage(), to.stage()) {
            // REJECTED is reachable from every non-terminal status
            (_, None) => Ok(()),
            (Some(current), Some(next)) if next > current => Ok(()),
            _ => Err(TransitionError::Backward { from, to }),
        }
    }

    /// Statuses that `from` may move to, excluding itself
    pub fn next_statuses(&self, from: ComplaintStatus) -> Vec<ComplaintStatus> {
        ComplaintStatus::ALL
            .into_iter()
            .filter(|to| *to != from && self.check(from, *to).is_ok())
            .collect()
    }
}
