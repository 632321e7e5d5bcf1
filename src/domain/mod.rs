//! Domain layer: entities, identifiers and repository interfaces.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`object_id`] - Document identifiers
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on the HTTP pipeline or on
//! infrastructure. Repository traits are implemented in
//! [`crate::infrastructure`].

pub mod entities;
pub mod object_id;
pub mod repositories;

pub use object_id::ObjectId;
