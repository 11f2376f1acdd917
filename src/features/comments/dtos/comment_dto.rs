use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::CommentRecord;
use crate::shared::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentResponseDto {
    fn from(record: CommentRecord) -> Self {
        let c = record.comment;
        Self {
            id: c.id,
            complaint_id: c.complaint_id,
            author_id: c.author_id,
            author_name: record.author_name,
            body: c.body,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(
        length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"),
        custom(function = "not_blank")
    )]
    pub body: String,
}
