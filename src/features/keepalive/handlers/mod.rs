mod keepalive_handler;

pub use keepalive_handler::*;
