use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Keep-alive payload. Served as-is, outside the usual response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_checked: Option<usize>,
}

impl KeepAliveStatus {
    pub fn success(records_checked: usize) -> Self {
        Self {
            ok: true,
            message: Some("Keep-alive successful".to_string()),
            error: None,
            time: Utc::now(),
            records_checked: Some(records_checked),
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            ok: false,
            message: None,
            error: Some(error),
            time: Utc::now(),
            records_checked: None,
        }
    }
}
