//! Complaints: public browse and detail, authenticated submission, and the
//! authority console where statuses move through the lifecycle.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ComplaintService;
