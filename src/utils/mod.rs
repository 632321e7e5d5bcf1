//! Helper functions shared across layers.
//!
//! - [`crypto`] - Salted password hashing

pub mod crypto;
