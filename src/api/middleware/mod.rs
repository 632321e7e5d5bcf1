//! Router-wide tower layers.
//!
//! Per-route checks live in the guard chain (`crate::rest::guard`); the layers
//! here wrap the whole router.

pub mod panic;
pub mod tracing;
