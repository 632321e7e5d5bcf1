//! In-memory user repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewUser, User};
use crate::domain::object_id::ObjectId;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Process-local user store.
///
/// Email uniqueness is enforced under the write lock, so it is the
/// authoritative duplicate check even when two registrations race.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                format!("User with email «{}» exists.", new_user.email),
                "UserRepository",
            ));
        }

        let user = User {
            id: ObjectId::new(),
            name: new_user.name,
            email: new_user.email,
            avatar_url: None,
            user_type: new_user.user_type,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "user stored");
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_avatar(&self, id: &ObjectId, avatar_url: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("User with {id} not found."), "UserRepository"))?;
        user.avatar_url = Some(avatar_url.to_string());

        Ok(user.clone())
    }

    async fn exists(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(id))
    }
}
