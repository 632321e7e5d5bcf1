//! REST API layer for HTTP request/response handling.
//!
//! This layer translates requests into service calls and formats responses
//! according to the API contract. Routing and the guard pipeline live in
//! [`crate::rest`].
//!
//! # Modules
//!
//! - [`controllers`] - `/users` and `/offers` route lists and handlers
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`middleware`] - Router-wide tracing and panic layers

pub mod controllers;
pub mod dto;
pub mod middleware;
