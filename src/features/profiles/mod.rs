//! Profiles: the application-side mirror of identity-provider users.
//!
//! Only `role` and `full_name` are read here; there is no write path.

pub mod models;
pub mod services;

pub use services::ProfileService;
