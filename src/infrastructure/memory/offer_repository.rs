//! In-memory offer repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewOffer, Offer};
use crate::domain::object_id::ObjectId;
use crate::domain::repositories::OfferRepository;
use crate::error::AppError;

/// Process-local offer store.
#[derive(Default)]
pub struct InMemoryOfferRepository {
    offers: RwLock<HashMap<ObjectId, Offer>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn create(&self, new_offer: NewOffer) -> Result<Offer, AppError> {
        let offer = Offer {
            id: ObjectId::new(),
            title: new_offer.title,
            description: new_offer.description,
            city: new_offer.city,
            offer_type: new_offer.offer_type,
            is_premium: new_offer.is_premium,
            price: new_offer.price,
            bedrooms: new_offer.bedrooms,
            max_adults: new_offer.max_adults,
            host_id: new_offer.host_id,
            created_at: Utc::now(),
        };

        self.offers.write().await.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Offer>, AppError> {
        Ok(self.offers.read().await.get(id).cloned())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Offer>, AppError> {
        let mut offers: Vec<Offer> = self.offers.read().await.values().cloned().collect();

        // Ids embed a timestamp and a counter, so they sort by creation.
        offers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        offers.truncate(limit);

        Ok(offers)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.offers.write().await.remove(id).is_some())
    }

    async fn exists(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.offers.read().await.contains_key(id))
    }
}
