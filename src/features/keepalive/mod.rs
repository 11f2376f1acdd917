//! Keep-alive: a scheduled single-row read that keeps the hosted database warm.
//! Exposed over HTTP for external schedulers and run in-process on a timer.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::KeepAliveService;
pub use workers::KeepAliveWorker;
