use std::sync::Arc;

use crate::features::keepalive::dtos::KeepAliveStatus;
use crate::modules::store::ComplaintStore;

/// Trivial existence read that keeps the database from idling out
pub struct KeepAliveService {
    complaints: Arc<dyn ComplaintStore>,
}

impl KeepAliveService {
    pub fn new(complaints: Arc<dyn ComplaintStore>) -> Self {
        Self { complaints }
    }

    pub async fn ping(&self) -> KeepAliveStatus {
        match self.complaints.sample_complaint_ids(1).await {
            Ok(ids) => KeepAliveStatus::success(ids.len()),
            Err(e) => {
                tracing::error!("Keep-alive probe failed: {}", e);
                KeepAliveStatus::failure(e.to_string())
            }
        }
    }
}
