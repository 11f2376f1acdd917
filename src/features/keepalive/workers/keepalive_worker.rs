use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::keepalive::services::KeepAliveService;

/// Runs the keep-alive probe on a fixed timer
pub struct KeepAliveWorker {
    service: Arc<KeepAliveService>,
    period: Duration,
}

impl KeepAliveWorker {
    pub fn new(service: Arc<KeepAliveService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Run the worker in a background loop
    pub async fn run(&self) {
        tracing::info!("Starting keep-alive worker (every {:?})", self.period);

        let mut interval = interval(self.period);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&self) {
        let status = self.service.ping().await;
        if status.ok {
            tracing::info!(
                "Keep-alive ok, {} record(s) checked",
                status.records_checked.unwrap_or(0)
            );
        } else {
            tracing::warn!(
                "Keep-alive failed: {}",
                status.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
