use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::complaints::models::{ComplaintRecord, ComplaintStatus, Priority};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::not_blank;

/// Response DTO for complaint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: i32,
    /// Absent when the category has been deleted
    pub category_name: Option<String>,
    pub user_id: Uuid,
    pub author_name: Option<String>,
    pub municipality: Option<String>,
    pub ward: Option<String>,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub status_label: String,
    pub location_lat: f64,
    pub location_lng: f64,
    /// Incremented on every status change; send back as `expected_version`
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintRecord> for ComplaintResponseDto {
    fn from(record: ComplaintRecord) -> Self {
        let c = record.complaint;
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            category_id: c.category_id,
            category_name: record.category_name,
            user_id: c.user_id,
            author_name: record.author_name,
            municipality: c.municipality,
            ward: c.ward,
            priority: c.priority,
            status: c.status,
            status_label: c.status.label().to_string(),
            location_lat: c.location_lat,
            location_lng: c.location_lng,
            version: c.version,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Request DTO for submitting a complaint
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,

    pub category_id: i32,

    #[validate(length(max = 120, message = "Municipality must not exceed 120 characters"))]
    pub municipality: Option<String>,

    #[validate(length(max = 120, message = "Ward must not exceed 120 characters"))]
    pub ward: Option<String>,

    /// Defaults to LOW
    pub priority: Option<Priority>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub location_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub location_lng: f64,
}

/// Query params for the public complaint list. Filters combine with AND.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListComplaintsQuery {
    /// Exact status
    pub status: Option<ComplaintStatus>,
    /// Exact category
    pub category_id: Option<i32>,
    /// Case-insensitive text matched in title or description
    pub search: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ListComplaintsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Request DTO for a status transition
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateComplaintStatusDto {
    pub status: ComplaintStatus,
    /// When set, the change only applies if the complaint is still at this version
    pub expected_version: Option<i32>,
}
