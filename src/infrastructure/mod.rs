//! Infrastructure layer implementing the domain's repository interfaces.
//!
//! # Modules
//!
//! - [`memory`] - In-memory repositories (the only store shipped; the
//!   repository traits are the seam for a persistent one)

pub mod memory;
