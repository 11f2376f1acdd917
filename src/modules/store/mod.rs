//! Persistence boundary.
//!
//! Services talk to the relational store exclusively through these traits, one per
//! record type. `PgStore` backs them with Postgres; `MemoryStore` is the in-process
//! double used by tests.

mod postgres;

#[cfg(test)]
mod memory;

pub use postgres::PgStore;

#[cfg(test)]
pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::comments::models::{Comment, CommentRecord, NewComment};
use crate::features::complaints::models::{
    Complaint, ComplaintFilter, ComplaintRecord, ComplaintStatus, NewComplaint, StatusWrite,
};
use crate::features::profiles::models::Profile;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn find_category(&self, id: i32) -> Result<Option<Category>>;
    /// Case-insensitive lookup on the trimmed name
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn insert_category(&self, name: &str) -> Result<Category>;
    /// Returns false when no row matched
    async fn delete_category(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Filtered page, newest first, plus the total row count for the filter
    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<(Vec<ComplaintRecord>, i64)>;
    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>>;
    /// Inserts with status NEW and version 1
    async fn insert_complaint(&self, data: &NewComplaint) -> Result<Complaint>;
    /// Persist a new status. With `expected_version` the write only applies when the
    /// stored version still matches.
    async fn update_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        expected_version: Option<i32>,
    ) -> Result<StatusWrite>;
    async fn count_complaints_in_category(&self, category_id: i32) -> Result<i64>;
    /// Cheap existence read used by the keep-alive probe
    async fn sample_complaint_ids(&self, limit: i64) -> Result<Vec<Uuid>>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Thread for a complaint, oldest first
    async fn list_comments(&self, complaint_id: Uuid) -> Result<Vec<CommentRecord>>;
    async fn insert_comment(&self, data: &NewComment) -> Result<Comment>;
}
