//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give controllers a narrow API. They
//! know nothing about HTTP beyond returning [`crate::error::AppError`].
//!
//! # Available Services
//!
//! - [`services::user_service::UserService`] - Registration and profile updates
//! - [`services::offer_service::OfferService`] - Offer listing and ownership rules
//! - [`services::auth_service::AuthService`] - Credential checks and session tokens

pub mod services;
