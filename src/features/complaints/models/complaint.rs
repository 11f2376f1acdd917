use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Complaint lifecycle status matching the `complaint_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    New,
    Acknowledged,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::New,
        ComplaintStatus::Acknowledged,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Rejected,
    ];

    /// No transition leaves a terminal status under forward-only rules
    pub fn is_terminal(self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }

    /// Position along NEW → ACKNOWLEDGED → IN_PROGRESS → RESOLVED.
    /// REJECTED sits outside the main line.
    pub fn stage(self) -> Option<u8> {
        match self {
            ComplaintStatus::New => Some(0),
            ComplaintStatus::Acknowledged => Some(1),
            ComplaintStatus::InProgress => Some(2),
            ComplaintStatus::Resolved => Some(3),
            ComplaintStatus::Rejected => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::New => "New",
            ComplaintStatus::Acknowledged => "Acknowledged",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::New => write!(f, "NEW"),
            ComplaintStatus::Acknowledged => write!(f, "ACKNOWLEDGED"),
            ComplaintStatus::InProgress => write!(f, "IN_PROGRESS"),
            ComplaintStatus::Resolved => write!(f, "RESOLVED"),
            ComplaintStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Complaint priority matching the `complaint_priority` database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "complaint_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

/// Database model for complaint
#[derive(Debug, Clone, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: i32,
    pub user_id: Uuid,
    pub municipality: Option<String>,
    pub ward: Option<String>,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub location_lat: f64,
    pub location_lng: f64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complaint joined with its category name and author display name.
/// Either may be absent (deleted category, profile without a name).
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintRecord {
    #[sqlx(flatten)]
    pub complaint: Complaint,
    pub category_name: Option<String>,
    pub author_name: Option<String>,
}

/// Data for creating a complaint. Status is not part of it: new rows always start as NEW.
#[derive(Debug)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category_id: i32,
    pub user_id: Uuid,
    pub municipality: Option<String>,
    pub ward: Option<String>,
    pub priority: Priority,
    pub location_lat: f64,
    pub location_lng: f64,
}

/// Composable listing filters, combined with AND
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub exclude_status: Option<ComplaintStatus>,
    pub category_id: Option<i32>,
    /// Case-insensitive substring matched against title OR description
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl ComplaintFilter {
    /// Evaluate the filter dimensions against a single row (pagination excluded)
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(status) = self.status {
            if complaint.status != status {
                return false;
            }
        }
        if let Some(excluded) = self.exclude_status {
            if complaint.status == excluded {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if complaint.category_id != category_id {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            if !complaint.title.to_lowercase().contains(&needle)
                && !complaint.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Outcome of a status write
#[derive(Debug)]
pub enum StatusWrite {
    Updated(Complaint),
    NotFound,
    VersionConflict { current_version: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(title: &str, description: &str, status: ComplaintStatus, category_id: i32) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            category_id,
            user_id: Uuid::new_v4(),
            municipality: None,
            ward: None,
            priority: Priority::Low,
            status,
            location_lat: 27.7,
            location_lng: 85.3,
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_or_description() {
        let filter = ComplaintFilter {
            search: Some("pothole".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&complaint("Pothole on Main St", "deep", ComplaintStatus::New, 1)));
        assert!(filter.matches(&complaint("Road damage", "a huge POTHOLE", ComplaintStatus::New, 1)));
        assert!(!filter.matches(&complaint("Broken light", "dark street", ComplaintStatus::New, 1)));
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let filter = ComplaintFilter {
            status: Some(ComplaintStatus::New),
            category_id: Some(2),
            ..Default::default()
        };

        assert!(filter.matches(&complaint("a", "b", ComplaintStatus::New, 2)));
        assert!(!filter.matches(&complaint("a", "b", ComplaintStatus::New, 3)));
        assert!(!filter.matches(&complaint("a", "b", ComplaintStatus::Resolved, 2)));
    }

    #[test]
    fn test_exclude_status() {
        let filter = ComplaintFilter {
            exclude_status: Some(ComplaintStatus::Resolved),
            ..Default::default()
        };

        assert!(filter.matches(&complaint("a", "b", ComplaintStatus::Rejected, 1)));
        assert!(!filter.matches(&complaint("a", "b", ComplaintStatus::Resolved, 1)));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: ComplaintStatus = serde_json::from_str("\"ACKNOWLEDGED\"").unwrap();
        assert_eq!(parsed, ComplaintStatus::Acknowledged);
        assert_eq!(ComplaintStatus::InProgress.to_string(), "IN_PROGRESS");
    }
}
