//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::domain::object_id::ObjectId;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::InMemoryUserRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and assigns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken. This check
    /// is authoritative: callers may pre-check, but two concurrent inserts
    /// with the same email cannot both succeed.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    /// Finds a user by email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Sets the avatar URL and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn update_avatar(&self, id: &ObjectId, avatar_url: &str) -> Result<User, AppError>;

    /// Returns whether a user with this id exists.
    async fn exists(&self, id: &ObjectId) -> Result<bool, AppError>;
}
