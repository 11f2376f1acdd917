//! Complaint lifecycle and access policy.
//!
//! Every route and every mutating service consults this module instead of
//! checking roles on its own.

mod access;
mod lifecycle;

pub mod dto;
pub mod handler;
pub mod routes;

pub use access::{authorize, evaluate, require_session, AccessDecision, RouteClass};
pub use lifecycle::{Lifecycle, TransitionError, TransitionMode};
