use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Session;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::models::NewComment;
use crate::features::policy::{authorize, RouteClass};
use crate::modules::store::{CommentStore, ComplaintStore};

/// Comment threads on complaints. Comments are append-only.
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    complaints: Arc<dyn ComplaintStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, complaints: Arc<dyn ComplaintStore>) -> Self {
        Self {
            comments,
            complaints,
        }
    }

    /// Thread for a complaint, oldest first
    pub async fn list(&self, complaint_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        self.ensure_complaint(complaint_id).await?;
        self.thread(complaint_id).await
    }

    /// Append a comment and return the re-fetched thread
    pub async fn create(
        &self,
        session: &Session,
        complaint_id: Uuid,
        dto: CreateCommentDto,
    ) -> Result<Vec<CommentResponseDto>> {
        authorize(Some(session), RouteClass::Submit)?;

        let body = dto.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Comment must not be empty".to_string()));
        }

        self.ensure_complaint(complaint_id).await?;

        let comment = self
            .comments
            .insert_comment(&NewComment {
                complaint_id,
                author_id: session.user_id,
                body: body.to_string(),
            })
            .await?;
        tracing::info!(
            "Comment added: id={}, complaint={}, by={}",
            comment.id,
            complaint_id,
            session.user_id
        );

        self.thread(complaint_id).await
    }

    async fn thread(&self, complaint_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        let records = self.comments.list_comments(complaint_id).await?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    async fn ensure_complaint(&self, complaint_id: Uuid) -> Result<()> {
        match self.complaints.find_complaint(complaint_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Complaint not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::models::{NewComplaint, Priority};
    use crate::features::profiles::models::Role;
    use crate::modules::store::MemoryStore;
    use crate::shared::test_helpers::session_with_role;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    async fn setup() -> (Arc<MemoryStore>, CommentService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let complaint = store
            .insert_complaint(&NewComplaint {
                title: "Blocked drain".to_string(),
                description: "Water pools after rain".to_string(),
                category_id: 1,
                user_id: Uuid::new_v4(),
                municipality: None,
                ward: None,
                priority: Priority::High,
                location_lat: 27.7,
                location_lng: 85.3,
            })
            .await
            .unwrap();
        let service = CommentService::new(store.clone(), store.clone());
        (store, service, complaint.id)
    }

    fn comment(body: &str) -> CreateCommentDto {
        CreateCommentDto {
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_thread_is_oldest_first_with_author_names() {
        let (store, service, complaint_id) = setup().await;
        let author = session_with_role(Role::User);
        store
            .seed_profile(author.user_id, "Maya Shrestha", Role::User)
            .await;

        for _ in 0..3 {
            let text: String = Sentence(2..5).fake();
            service
                .create(&author, complaint_id, comment(&text))
                .await
                .unwrap();
        }

        let thread = service.list(complaint_id).await.unwrap();
        assert_eq!(thread.len(), 3);
        assert!(thread
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
        assert!(thread
            .iter()
            .all(|c| c.author_name.as_deref() == Some("Maya Shrestha")));
    }

    #[tokio::test]
    async fn test_same_timestamp_keeps_posting_order() {
        let (store, service, complaint_id) = setup().await;
        let author = session_with_role(Role::User);
        store.pin_time(chrono::Utc::now());

        let posted = ["first", "second", "third", "fourth", "fifth"];
        for body in posted {
            service
                .create(&author, complaint_id, comment(body))
                .await
                .unwrap();
        }

        let thread = service.list(complaint_id).await.unwrap();
        let bodies: Vec<&str> = thread.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, posted);
    }

    #[tokio::test]
    async fn test_create_returns_refetched_thread() {
        let (_, service, complaint_id) = setup().await;
        let author = session_with_role(Role::Authority);

        service
            .create(&author, complaint_id, comment("Crew scheduled"))
            .await
            .unwrap();
        let thread = service
            .create(&author, complaint_id, comment("  Work started  "))
            .await
            .unwrap();

        let bodies: Vec<&str> = thread.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["Crew scheduled", "Work started"]);
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected() {
        let (_, service, complaint_id) = setup().await;
        let result = service
            .create(&session_with_role(Role::User), complaint_id, comment("   "))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list(complaint_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_complaint() {
        let (_, service, _) = setup().await;
        let result = service
            .create(&session_with_role(Role::User), Uuid::new_v4(), comment("Hello"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
