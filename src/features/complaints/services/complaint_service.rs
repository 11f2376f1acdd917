use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Session;
use crate::features::complaints::dtos::{
    ComplaintResponseDto, CreateComplaintDto, ListComplaintsQuery, UpdateComplaintStatusDto,
};
use crate::features::complaints::models::{
    ComplaintFilter, ComplaintRecord, ComplaintStatus, NewComplaint, StatusWrite,
};
use crate::features::policy::{authorize, Lifecycle, RouteClass, TransitionMode};
use crate::modules::store::{CategoryStore, ComplaintStore};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{is_unselected_location, normalize_optional};

pub const SELECT_LOCATION_NOTICE: &str = "Please select a location on the map";

/// Browse, submit and triage complaints
pub struct ComplaintService {
    complaints: Arc<dyn ComplaintStore>,
    categories: Arc<dyn CategoryStore>,
    lifecycle: Lifecycle,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintStore>,
        categories: Arc<dyn CategoryStore>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            complaints,
            categories,
            lifecycle,
        }
    }

    /// Public browse list, newest first
    pub async fn list(&self, query: &ListComplaintsQuery) -> Result<(Vec<ComplaintResponseDto>, i64)> {
        let pagination = query.pagination();
        let filter = ComplaintFilter {
            status: query.status,
            exclude_status: None,
            category_id: query.category_id,
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            offset: pagination.offset(),
            limit: pagination.limit(),
        };

        self.fetch(&filter).await
    }

    /// Triage console: everything not yet resolved, newest first
    pub async fn list_console(
        &self,
        session: &Session,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ComplaintResponseDto>, i64)> {
        authorize(Some(session), RouteClass::Console)?;

        let filter = ComplaintFilter {
            exclude_status: Some(ComplaintStatus::Resolved),
            offset: pagination.offset(),
            limit: pagination.limit(),
            ..Default::default()
        };

        self.fetch(&filter).await
    }

    async fn fetch(&self, filter: &ComplaintFilter) -> Result<(Vec<ComplaintResponseDto>, i64)> {
        let (records, total) = self.complaints.list_complaints(filter).await?;
        Ok((records.into_iter().map(|r| r.into()).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<ComplaintResponseDto> {
        self.find(id).await.map(|r| r.into())
    }

    async fn find(&self, id: Uuid) -> Result<ComplaintRecord> {
        self.complaints
            .find_complaint(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))
    }

    /// Submit a complaint. It always starts as NEW.
    pub async fn create(
        &self,
        session: &Session,
        dto: CreateComplaintDto,
    ) -> Result<ComplaintResponseDto> {
        authorize(Some(session), RouteClass::Submit)?;

        let title = dto.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        let description = dto.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }

        if is_unselected_location(dto.location_lat, dto.location_lng) {
            return Err(AppError::Validation(SELECT_LOCATION_NOTICE.to_string()));
        }

        let category = self
            .categories
            .find_category(dto.category_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("Category {} does not exist", dto.category_id))
            })?;

        let data = NewComplaint {
            title: title.to_string(),
            description: description.to_string(),
            category_id: category.id,
            user_id: session.user_id,
            municipality: normalize_optional(dto.municipality),
            ward: normalize_optional(dto.ward),
            priority: dto.priority.unwrap_or_default(),
            location_lat: dto.location_lat,
            location_lng: dto.location_lng,
        };

        let complaint = self.complaints.insert_complaint(&data).await?;
        tracing::info!(
            "Complaint created: id={}, category={}, by={}",
            complaint.id,
            category.id,
            session.user_id
        );

        Ok(ComplaintRecord {
            complaint,
            category_name: Some(category.name),
            author_name: session.full_name.clone(),
        }
        .into())
    }

    /// Move a complaint to a new status (authority or admin).
    ///
    /// A failed write leaves the stored status untouched and is not retried.
    pub async fn set_status(
        &self,
        session: &Session,
        id: Uuid,
        dto: UpdateComplaintStatusDto,
    ) -> Result<ComplaintResponseDto> {
        authorize(Some(session), RouteClass::Console)?;

        let current = self.find(id).await?;
        let from = current.complaint.status;

        if let Some(expected) = dto.expected_version {
            if expected != current.complaint.version {
                return Err(version_conflict(current.complaint.version));
            }
        }

        if from == dto.status {
            return Ok(current.into());
        }

        self.lifecycle.check(from, dto.status)?;

        // Under forward-only rules the check above must still hold at write time
        let expected_version = match self.lifecycle.mode() {
            TransitionMode::ForwardOnly => Some(current.complaint.version),
            TransitionMode::Open => dto.expected_version,
        };

        let write = self
            .complaints
            .update_complaint_status(id, dto.status, expected_version)
            .await?;

        match write {
            StatusWrite::Updated(complaint) => {
                tracing::info!(
                    "Complaint status updated: id={}, {} -> {}, version={}, by={}",
                    id,
                    from,
                    complaint.status,
                    complaint.version,
                    session.user_id
                );
                Ok(ComplaintRecord {
                    complaint,
                    category_name: current.category_name,
                    author_name: current.author_name,
                }
                .into())
            }
            StatusWrite::NotFound => Err(AppError::NotFound("Complaint not found".to_string())),
            StatusWrite::VersionConflict { current_version } => {
                tracing::warn!(
                    "Concurrent status change on complaint {} (now version {})",
                    id,
                    current_version
                );
                Err(version_conflict(current_version))
            }
        }
    }
}

fn version_conflict(current_version: i32) -> AppError {
    AppError::Conflict(format!(
        "Complaint was changed by someone else (current version {})",
        current_version
    ))
}
