mod keepalive_dto;

pub use keepalive_dto::KeepAliveStatus;
