//! User account service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::ObjectId;
use crate::domain::entities::{NewUser, User, UserType};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::rest::guard::DocumentLookup;
use crate::utils::crypto::hash_password;

/// Collection name answered by the [`DocumentLookup`] impl.
pub const USER_COLLECTION: &str = "User";

/// Registration input after DTO validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

/// Service for registering users and maintaining their profile.
///
/// Passwords are hashed with the server salt before they reach the repository.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    salt: String,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>, salt: String) -> Self {
        Self { repository, salt }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    pub async fn create(&self, registration: Registration) -> Result<User, AppError> {
        let new_user = NewUser {
            name: registration.name,
            email: registration.email,
            user_type: registration.user_type,
            password_hash: hash_password(&registration.password, &self.salt),
        };

        let user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %user.id, "New user created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.repository.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Stores the avatar URL for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user disappeared meanwhile.
    pub async fn update_avatar(&self, id: &ObjectId, avatar_url: &str) -> Result<User, AppError> {
        self.repository.update_avatar(id, avatar_url).await
    }
}

#[async_trait]
impl<R: UserRepository> DocumentLookup for UserService<R> {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        if collection != USER_COLLECTION {
            return Err(AppError::internal(anyhow::anyhow!(
                "UserService cannot look up `{collection}` documents"
            )));
        }

        match id.parse::<ObjectId>() {
            Ok(id) => self.repository.exists(&id).await,
            Err(_) => Ok(false),
        }
    }
}
