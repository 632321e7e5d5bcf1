//! # Six Cities
//!
//! Backend for a short-term rental listing service, built on Axum around a
//! declarative request pipeline.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, identifiers and repository traits
//! - **Application Layer** ([`application`]) - Services and the auth boundary
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory repositories
//! - **Pipeline** ([`rest`]) - Route table, guards, chain executor
//! - **API Layer** ([`api`]) - Controllers, DTOs and router-wide layers
//!
//! ## Request flow
//!
//! ```text
//! request -> route table (method + path) -> guards in order -> handler
//!                                  \-> any failure -> AppError -> JSON response
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export SALT="change-me"
//! export JWT_SECRET="change-me-too"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod rest;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, OfferService, UserService};
    pub use crate::domain::ObjectId;
    pub use crate::domain::entities::{Identity, Offer, User};
    pub use crate::error::AppError;
    pub use crate::rest::{Guard, Middleware, RequestContext, Route, RouteTable};
    pub use crate::state::AppState;
}
