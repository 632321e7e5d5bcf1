//! Core domain entities.
//!
//! Entities are plain data structures. Creation goes through separate `New*`
//! structs so identifiers and timestamps are assigned by the repository.
//!
//! - [`User`] - A registered guest or host
//! - [`Offer`] - A rental listing

pub mod offer;
pub mod user;

pub use offer::{NewOffer, Offer, OfferType};
pub use user::{Credentials, Identity, NewUser, User, UserType};
