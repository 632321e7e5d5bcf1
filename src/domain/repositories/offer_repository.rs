//! Repository trait for rental offers.

use crate::domain::entities::{NewOffer, Offer};
use crate::domain::object_id::ObjectId;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for offer storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Stores a new offer and assigns its id and creation time.
    async fn create(&self, new_offer: NewOffer) -> Result<Offer, AppError>;

    /// Finds an offer by id.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Offer>, AppError>;

    /// Lists offers, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<Offer>, AppError>;

    /// Removes an offer. Returns `false` if it did not exist.
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;

    /// Returns whether an offer with this id exists.
    async fn exists(&self, id: &ObjectId) -> Result<bool, AppError>;
}
