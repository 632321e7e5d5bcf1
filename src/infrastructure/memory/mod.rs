//! Process-local repository implementations.
//!
//! - [`InMemoryUserRepository`] - User accounts
//! - [`InMemoryOfferRepository`] - Rental offers

pub mod offer_repository;
pub mod user_repository;

pub use offer_repository::InMemoryOfferRepository;
pub use user_repository::InMemoryUserRepository;
