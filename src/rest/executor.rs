//! Chain executor: guards in order, then the handler.
//!
//! Exactly one of two things happens per request: the handler produces a
//! response, or some step produces an [`AppError`]. Failures are caught here
//! once and rendered by [`AppError::into_response`].

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use tokio::time::timeout_at;

use crate::error::AppError;
use crate::rest::context::RequestContext;
use crate::rest::route::Route;
use crate::rest::route_table::PipelineSettings;

/// Origin reported when the handler itself outlives the deadline.
pub const HANDLER_ORIGIN: &str = "Handler";

/// Runs `route`'s guards strictly in registration order, then its handler.
///
/// Each step is awaited before the next one starts and is bounded by the
/// context deadline. The first failing step short-circuits the chain.
pub async fn run_chain(route: &Route, mut ctx: RequestContext) -> Result<Response, AppError> {
    let deadline = ctx.deadline();

    for (position, guard) in route.chain().iter().enumerate() {
        let step = guard.name();

        match timeout_at(deadline, guard.apply(&mut ctx)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::debug!(
                    method = %route.method(),
                    path = %route.path(),
                    step,
                    position,
                    error = %err,
                    "Chain short-circuited"
                );
                return Err(err);
            }
            Err(_) => {
                tracing::warn!(
                    method = %route.method(),
                    path = %route.path(),
                    step,
                    "Request deadline exceeded"
                );
                return Err(AppError::timeout(step));
            }
        }
    }

    match timeout_at(deadline, route.handler().call(ctx)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                method = %route.method(),
                path = %route.path(),
                step = HANDLER_ORIGIN,
                "Request deadline exceeded"
            );
            Err(AppError::timeout(HANDLER_ORIGIN))
        }
    }
}

/// Builds the context for a matched request and runs the chain, rendering
/// any failure through the error mapper.
pub async fn execute(
    route: &Route,
    request: Request,
    params: HashMap<String, String>,
    settings: &PipelineSettings,
) -> Response {
    let outcome = match RequestContext::from_request(request, params, settings).await {
        Ok(ctx) => run_chain(route, ctx).await,
        Err(err) => Err(err),
    };

    outcome.unwrap_or_else(IntoResponse::into_response)
}
