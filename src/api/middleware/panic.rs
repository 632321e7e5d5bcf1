//! Panic-to-500 layer.

use axum::response::{IntoResponse, Response};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Catches panics in handlers and guards and renders the generic 500 body.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_panic_renders_generic_body() {
        let response = handle_panic(Box::new("secret.db is locked"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Internal Server Error");
        assert!(!body.to_string().contains("secret.db"));
    }
}
