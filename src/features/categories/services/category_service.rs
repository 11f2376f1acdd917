use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Session;
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, DeleteCategoryResponseDto,
};
use crate::features::policy::{authorize, RouteClass};
use crate::modules::store::{CategoryStore, ComplaintStore};

/// Service for category operations
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    complaints: Arc<dyn ComplaintStore>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>, complaints: Arc<dyn ComplaintStore>) -> Self {
        Self {
            categories,
            complaints,
        }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.categories.list_categories().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get(&self, id: i32) -> Result<CategoryResponseDto> {
        self.categories
            .find_category(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Add a category (admin only). Names are unique ignoring case.
    pub async fn create(
        &self,
        session: &Session,
        dto: CreateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        authorize(Some(session), RouteClass::Admin)?;

        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        if let Some(existing) = self.categories.find_category_by_name(name).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                existing.name
            )));
        }

        let category = self.categories.insert_category(name).await?;
        tracing::info!(
            "Category created: id={}, name={}, by={}",
            category.id,
            category.name,
            session.user_id
        );

        Ok(category.into())
    }

    /// Delete a category (admin only).
    ///
    /// Complaints referencing it are left in place; the count is reported back.
    pub async fn delete(&self, session: &Session, id: i32) -> Result<DeleteCategoryResponseDto> {
        authorize(Some(session), RouteClass::Admin)?;

        if self.categories.find_category(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        // Counted before the delete so a failed read leaves the category in place
        let orphaned_complaints = self.complaints.count_complaints_in_category(id).await?;

        if !self.categories.delete_category(id).await? {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        if orphaned_complaints > 0 {
            tracing::warn!(
                "Category {} deleted while referenced by {} complaint(s)",
                id,
                orphaned_complaints
            );
        } else {
            tracing::info!("Category deleted: id={}, by={}", id, session.user_id);
        }

        Ok(DeleteCategoryResponseDto {
            id,
            orphaned_complaints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::models::{NewComplaint, Priority};
    use crate::modules::store::MemoryStore;
    use crate::shared::test_helpers::{admin_session, authority_session};
    use uuid::Uuid;

    fn service(store: &Arc<MemoryStore>) -> CategoryService {
        CategoryService::new(store.clone(), store.clone())
    }

    fn name(value: &str) -> CreateCategoryDto {
        CreateCategoryDto {
            name: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_lists_by_name() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let admin = admin_session();

        service.create(&admin, name("  Roads ")).await.unwrap();
        service.create(&admin, name("Drainage")).await.unwrap();

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Drainage", "Roads"]);
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let store = Arc::new(MemoryStore::new());
        let result = service(&store).create(&authority_session(), name("Parks")).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(store.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let admin = admin_session();

        service.create(&admin, name("Waste")).await.unwrap();
        let result = service.create(&admin, name("WASTE")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_and_reports_orphans() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let admin = admin_session();

        let category = service.create(&admin, name("Noise")).await.unwrap();
        store
            .insert_complaint(&NewComplaint {
                title: "Late night drilling".to_string(),
                description: "Construction after midnight".to_string(),
                category_id: category.id,
                user_id: Uuid::new_v4(),
                municipality: None,
                ward: None,
                priority: Priority::Low,
                location_lat: 27.71,
                location_lng: 85.32,
            })
            .await
            .unwrap();

        let deleted = service.delete(&admin, category.id).await.unwrap();
        assert_eq!(deleted.orphaned_complaints, 1);
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(
            service.get(category.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_orphan_count_keeps_category() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let admin = admin_session();
        let category = service.create(&admin, name("Streetlights")).await.unwrap();

        store.set_offline(true);
        let result = service.delete(&admin, category.id).await;
        store.set_offline(false);

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(service.get(category.id).await.unwrap().name, "Streetlights");

        let deleted = service.delete(&admin, category.id).await.unwrap();
        assert_eq!(deleted.orphaned_complaints, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_category() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let admin = admin_session();
        let category = service.create(&admin, name("Parks")).await.unwrap();

        store.fail_writes(true);
        let result = service.delete(&admin, category.id).await;
        store.fail_writes(false);

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(service.get(category.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let store = Arc::new(MemoryStore::new());
        let result = service(&store).delete(&admin_session(), 404).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
