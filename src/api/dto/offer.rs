//! DTOs for offer endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::ObjectId;
use crate::domain::entities::{NewOffer, Offer, OfferType};
use crate::error::AppError;

/// Body of `POST /offers`. The host is the authenticated caller.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOfferDto {
    #[validate(length(min = 10, max = 100, message = "title must be 10 to 100 characters"))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 1024,
        message = "description must be 20 to 1024 characters"
    ))]
    pub description: String,

    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,

    #[validate(required(message = "offerType must be apartment, house, room or hotel"))]
    pub offer_type: Option<OfferType>,

    pub is_premium: bool,

    #[validate(range(min = 100, max = 100000, message = "price must be 100 to 100000"))]
    pub price: u32,

    #[validate(range(min = 1, max = 8, message = "bedrooms must be 1 to 8"))]
    pub bedrooms: u8,

    #[validate(range(min = 1, max = 10, message = "maxAdults must be 1 to 10"))]
    pub max_adults: u8,
}

impl CreateOfferDto {
    /// Builds the offer for `host_id`. Only call this on a validated DTO.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if `offer_type` is missing, which means
    /// the DTO never went through validation.
    pub fn into_new_offer(self, host_id: ObjectId) -> Result<NewOffer, AppError> {
        let offer_type = self.offer_type.ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("CreateOfferDto used without validation"))
        })?;

        Ok(NewOffer {
            title: self.title,
            description: self.description,
            city: self.city,
            offer_type,
            is_premium: self.is_premium,
            price: self.price,
            bedrooms: self.bedrooms,
            max_adults: self.max_adults,
            host_id,
        })
    }
}

/// Public view of an offer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRdo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub offer_type: OfferType,
    pub is_premium: bool,
    pub price: u32,
    pub bedrooms: u8,
    pub max_adults: u8,
    pub host_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Offer> for OfferRdo {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id.to_hex(),
            title: offer.title,
            description: offer.description,
            city: offer.city,
            offer_type: offer.offer_type,
            is_premium: offer.is_premium,
            price: offer.price,
            bedrooms: offer.bedrooms,
            max_adults: offer.max_adults,
            host_id: offer.host_id.to_hex(),
            created_at: offer.created_at,
        }
    }
}
