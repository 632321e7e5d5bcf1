//! Rental offer entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::object_id::ObjectId;

/// Kind of accommodation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Apartment,
    House,
    Room,
    Hotel,
}

/// A listing published by a host.
#[derive(Debug, Clone)]
pub struct Offer {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub city: String,
    pub offer_type: OfferType,
    pub is_premium: bool,
    pub price: u32,
    pub bedrooms: u8,
    pub max_adults: u8,
    pub host_id: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn is_hosted_by(&self, user_id: &ObjectId) -> bool {
        &self.host_id == user_id
    }
}

/// Input data for creating a new offer.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub city: String,
    pub offer_type: OfferType,
    pub is_premium: bool,
    pub price: u32,
    pub bedrooms: u8,
    pub max_adults: u8,
    pub host_id: ObjectId,
}
