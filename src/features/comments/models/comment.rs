use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for comment. Comments are append-only.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's display name
#[derive(Debug, Clone, FromRow)]
pub struct CommentRecord {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: Option<String>,
}

/// Data for appending a comment
#[derive(Debug)]
pub struct NewComment {
    pub complaint_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
}
