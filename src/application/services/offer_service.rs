//! Offer listing service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::ObjectId;
use crate::domain::entities::{Identity, NewOffer, Offer};
use crate::domain::repositories::OfferRepository;
use crate::error::AppError;
use crate::rest::guard::DocumentLookup;

pub const OFFER_COLLECTION: &str = "Offer";

/// Number of offers returned when the client sets no limit.
pub const DEFAULT_OFFER_COUNT: usize = 60;

pub struct OfferService<R: OfferRepository> {
    repository: Arc<R>,
}

impl<R: OfferRepository> OfferService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, new_offer: NewOffer) -> Result<Offer, AppError> {
        let offer = self.repository.create(new_offer).await?;
        tracing::info!(offer_id = %offer.id, host_id = %offer.host_id, "New offer created");
        Ok(offer)
    }

    /// Newest offers first, at most `limit` of them.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Offer>, AppError> {
        self.repository
            .list(limit.unwrap_or(DEFAULT_OFFER_COUNT))
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no offer has this id.
    pub async fn find(&self, id: &ObjectId) -> Result<Offer, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Offer with {id} not found."), "OfferService"))
    }

    /// Deletes an offer on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the offer does not exist and
    /// [`AppError::Forbidden`] if `requester` is not its host.
    pub async fn delete(&self, id: &ObjectId, requester: &Identity) -> Result<(), AppError> {
        let offer = self.find(id).await?;

        if !offer.is_hosted_by(&requester.id) {
            return Err(AppError::forbidden(
                format!("Offer {id} belongs to another host"),
                "OfferService",
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(
                format!("Offer with {id} not found."),
                "OfferService",
            ));
        }

        tracing::info!(offer_id = %id, "Offer deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: OfferRepository> DocumentLookup for OfferService<R> {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        if collection != OFFER_COLLECTION {
            return Err(AppError::internal(anyhow::anyhow!(
                "OfferService cannot look up `{collection}` documents"
            )));
        }

        match id.parse::<ObjectId>() {
            Ok(id) => self.repository.exists(&id).await,
            Err(_) => Ok(false),
        }
    }
}
