use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::profiles::models::{Profile, Role};
use crate::modules::store::ProfileStore;

/// Read-only access to profiles. Profiles are provisioned and edited by the
/// identity provider; this service only resolves display name and role.
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn find(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.store.find_profile(user_id).await
    }

    /// Role for a user id; a user without a profile row gets the default role
    pub async fn role_of(&self, user_id: Uuid) -> Result<(Role, Option<String>)> {
        let profile = self.find(user_id).await?;
        Ok(match profile {
            Some(p) => (p.role, p.full_name),
            None => {
                tracing::debug!("No profile for user {}, using default role", user_id);
                (Role::default(), None)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::MemoryStore;

    #[tokio::test]
    async fn test_role_of_known_profile() {
        let store = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();
        store.seed_profile(id, "Asha Rai", Role::Authority).await;

        let service = ProfileService::new(store);
        let (role, name) = service.role_of(id).await.unwrap();

        assert_eq!(role, Role::Authority);
        assert_eq!(name.as_deref(), Some("Asha Rai"));
    }

    #[tokio::test]
    async fn test_role_of_missing_profile_defaults_to_user() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let (role, name) = service.role_of(Uuid::new_v4()).await.unwrap();

        assert_eq!(role, Role::User);
        assert!(name.is_none());
    }
}
