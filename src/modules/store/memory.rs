use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStore, CommentStore, ComplaintStore, ProfileStore};
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::comments::models::{Comment, CommentRecord, NewComment};
use crate::features::complaints::models::{
    Complaint, ComplaintFilter, ComplaintRecord, ComplaintStatus, NewComplaint, StatusWrite,
};
use crate::features::profiles::models::{Profile, Role};

/// In-process store used by tests. Writes can be made to fail on demand.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    categories: RwLock<Vec<Category>>,
    complaints: RwLock<Vec<Complaint>>,
    comments: RwLock<Vec<Comment>>,
    next_category_id: AtomicI32,
    fail_writes: AtomicBool,
    offline: AtomicBool,
    pinned_time: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_profile(&self, id: Uuid, full_name: &str, role: Role) {
        let now = Utc::now();
        self.profiles.write().await.insert(
            id,
            Profile {
                id,
                full_name: Some(full_name.to_string()),
                role,
                created_at: now,
                updated_at: now,
            },
        );
    }

    /// Make every subsequent write return a database error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make complaint reads (keep-alive probe, orphan counts) fail
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Stamp every subsequent insert with `at` instead of the wall clock
    pub fn pin_time(&self, at: DateTime<Utc>) {
        *self.pinned_time.lock().unwrap() = Some(at);
    }

    fn now(&self) -> DateTime<Utc> {
        self.pinned_time.lock().unwrap().unwrap_or_else(Utc::now)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn to_record(&self, complaint: Complaint) -> ComplaintRecord {
        let category_name = self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == complaint.category_id)
            .map(|c| c.name.clone());
        let author_name = self
            .profiles
            .read()
            .await
            .get(&complaint.user_id)
            .and_then(|p| p.full_name.clone());

        ComplaintRecord {
            complaint,
            category_name,
            author_name,
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.name.trim().to_lowercase() == wanted)
            .cloned())
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        self.check_writable()?;
        let category = Category {
            id: self.next_category_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: i32) -> Result<bool> {
        self.check_writable()?;
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<(Vec<ComplaintRecord>, i64)> {
        // Newest first; later inserts win ties on identical timestamps
        let mut matching: Vec<Complaint> = self
            .complaints
            .read()
            .await
            .iter()
            .rev()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page: Vec<Complaint> = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        let mut records = Vec::with_capacity(page.len());
        for complaint in page {
            records.push(self.to_record(complaint).await);
        }
        Ok((records, total))
    }

    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>> {
        let complaint = self
            .complaints
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned();

        match complaint {
            Some(c) => Ok(Some(self.to_record(c).await)),
            None => Ok(None),
        }
    }

    async fn insert_complaint(&self, data: &NewComplaint) -> Result<Complaint> {
        self.check_writable()?;
        let now = Utc::now();
        let complaint = Complaint {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            category_id: data.category_id,
            user_id: data.user_id,
            municipality: data.municipality.clone(),
            ward: data.ward.clone(),
            priority: data.priority,
            status: ComplaintStatus::New,
            location_lat: data.location_lat,
            location_lng: data.location_lng,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.complaints.write().await.push(complaint.clone());
        Ok(complaint)
    }

    async fn update_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        expected_version: Option<i32>,
    ) -> Result<StatusWrite> {
        self.check_writable()?;
        let mut complaints = self.complaints.write().await;
        let Some(complaint) = complaints.iter_mut().find(|c| c.id == id) else {
            return Ok(StatusWrite::NotFound);
        };

        if let Some(expected) = expected_version {
            if complaint.version != expected {
                return Ok(StatusWrite::VersionConflict {
                    current_version: complaint.version,
                });
            }
        }

        complaint.status = status;
        complaint.version += 1;
        complaint.updated_at = Utc::now();
        Ok(StatusWrite::Updated(complaint.clone()))
    }

    async fn count_complaints_in_category(&self, category_id: i32) -> Result<i64> {
        self.check_online()?;
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .filter(|c| c.category_id == category_id)
            .count() as i64)
    }

    async fn sample_complaint_ids(&self, limit: i64) -> Result<Vec<Uuid>> {
        self.check_online()?;
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .take(limit.max(0) as usize)
            .map(|c| c.id)
            .collect())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn list_comments(&self, complaint_id: Uuid) -> Result<Vec<CommentRecord>> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.complaint_id == complaint_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let profiles = self.profiles.read().await;
        Ok(comments
            .into_iter()
            .map(|comment| {
                let author_name = profiles
                    .get(&comment.author_id)
                    .and_then(|p| p.full_name.clone());
                CommentRecord {
                    comment,
                    author_name,
                }
            })
            .collect())
    }

    async fn insert_comment(&self, data: &NewComment) -> Result<Comment> {
        self.check_writable()?;
        let comment = Comment {
            id: Uuid::now_v7(),
            complaint_id: data.complaint_id,
            author_id: data.author_id,
            body: data.body.clone(),
            created_at: self.now(),
        };
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }
}
