mod keepalive_worker;

pub use keepalive_worker::KeepAliveWorker;
