//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/users/*`  - Registration, login, profile, avatar upload
//! - `/offers/*` - Offer listing and management
//! - `/upload/*` - Uploaded files, served statically
//!
//! Anything else gets a bare `404` without running any guard.
//!
//! # Layers
//!
//! - **Tracing** - Structured request/response logging
//! - **Catch panic** - Panics become the generic `500` body

use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::controllers::{OfferController, UserController};
use crate::api::middleware::{panic as panic_layer, tracing as trace_layer};
use crate::rest::{PipelineSettings, RouteError, RouteTable};
use crate::state::AppState;

/// URL prefix under which stored uploads are served.
pub const UPLOAD_ROUTE: &str = "/upload";

/// Builds the application router.
///
/// # Errors
///
/// Returns [`RouteError`] if two controllers register the same route.
pub fn app_router(state: &AppState) -> Result<Router, RouteError> {
    let config = &state.config;
    let mut table = RouteTable::new(PipelineSettings::from_config(config));

    table.mount(Arc::new(UserController::new(
        state.user_service.clone(),
        state.auth_service.clone(),
        config.upload_directory.clone(),
        config.max_upload_bytes,
    )))?;
    table.mount(Arc::new(OfferController::new(
        state.offer_service.clone(),
        state.auth_service.clone(),
    )))?;

    tracing::info!(routes = table.len(), "Route table compiled");

    Ok(table
        .into_router()
        .nest_service(UPLOAD_ROUTE, ServeDir::new(&config.upload_directory))
        .layer(panic_layer::layer())
        .layer(trace_layer::layer()))
}
