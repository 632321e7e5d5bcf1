//! Business logic services for the application layer.

pub mod auth_service;
pub mod offer_service;
pub mod user_service;

pub use auth_service::{AuthService, Claims, JwtAuthService};
pub use offer_service::OfferService;
pub use user_service::{Registration, UserService};

#[cfg(test)]
pub use auth_service::MockAuthService;
