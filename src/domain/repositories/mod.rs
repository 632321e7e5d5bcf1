//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure`. Mock implementations are auto-generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts
//! - [`OfferRepository`] - Rental offers

pub mod offer_repository;
pub mod user_repository;

pub use offer_repository::OfferRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use offer_repository::MockOfferRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
