//! Shared controller surface: route list plus uniform response helpers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::rest::route::Route;

/// A group of routes mounted under a common prefix.
///
/// ```rust,ignore
/// impl Controller for OfferController {
///     fn prefix(&self) -> &'static str { "/offers" }
///
///     fn routes(self: Arc<Self>) -> Vec<Route> {
///         vec![Route::get("/", bind(&self, Self::index))]
///     }
/// }
/// ```
pub trait Controller: Send + Sync + 'static {
    fn prefix(&self) -> &'static str;

    fn routes(self: Arc<Self>) -> Vec<Route>;
}

/// `200 OK` with a JSON body.
pub fn ok<T: Serialize>(body: T) -> Result<Response, AppError> {
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// `201 Created` with a JSON body.
pub fn created<T: Serialize>(body: T) -> Result<Response, AppError> {
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// `204 No Content`.
pub fn no_content() -> Result<Response, AppError> {
    Ok(StatusCode::NO_CONTENT.into_response())
}
