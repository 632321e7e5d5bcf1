use axum::http::{HeaderMap, header};
use std::sync::Arc;

use crate::application::services::AuthService;
use crate::error::AppError;
use crate::rest::context::RequestContext;

const ORIGIN: &str = "Authenticate";

/// Resolves `Authorization: Bearer <token>` into the caller's identity.
#[derive(Clone)]
pub struct Authenticate {
    auth: Arc<dyn AuthService>,
}

impl Authenticate {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }

    pub(super) async fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        let token = extract_bearer(ctx.headers())?;
        let identity = self.auth.resolve(token).await?;

        ctx.set_identity(identity);
        Ok(())
    }
}

impl std::fmt::Debug for Authenticate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Authenticate")
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let unauthorized = || AppError::unauthorized("Authorization header is missing or invalid", ORIGIN);

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?
        .trim();

    if token.is_empty() {
        return Err(unauthorized());
    }
    Ok(token)
}
