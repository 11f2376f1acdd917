mod keepalive_service;

pub use keepalive_service::KeepAliveService;
