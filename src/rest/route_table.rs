//! Route registration and compilation into an Axum router.
//!
//! Controllers add their routes to a [`RouteTable`] once at startup. The table
//! rejects duplicate `(method, path)` pairs and ambiguous path templates, then
//! [`RouteTable::into_router`] turns every entry into an Axum handler that
//! builds a [`RequestContext`](crate::rest::RequestContext) and runs the route's chain.
//!
//! Path templates use named segments, `/:hostId/avatar` or
//! `/{hostId}/avatar`. Both forms are normalized to Axum's braces syntax.
//! Requests matching no template never reach this module and receive Axum's
//! default `404`.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Path, Request, rejection::PathRejection},
    http::{Method, StatusCode},
    routing::{MethodFilter, MethodRouter},
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::rest::controller::Controller;
use crate::rest::executor;
use crate::rest::route::Route;

/// Request limits applied while building each [`RequestContext`](crate::rest::RequestContext).
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes,
            request_timeout: config.request_timeout,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Startup-time route registration failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {method} {path} is registered twice")]
    Duplicate { method: Method, path: String },

    #[error("route {path} conflicts with {existing}")]
    Ambiguous { path: String, existing: String },

    #[error("invalid route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("method {0} cannot be routed")]
    UnsupportedMethod(Method),
}

/// All registered routes, keyed by normalized path template.
pub struct RouteTable {
    settings: PipelineSettings,
    routes: Vec<Route>,
    registered: HashSet<(Method, String)>,
    // shape (params erased) -> first template registered with that shape
    shapes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            routes: Vec::new(),
            registered: HashSet::new(),
            shapes: HashMap::new(),
        }
    }

    /// Registers one route under `prefix`.
    ///
    /// # Errors
    ///
    /// Fails if the path is malformed, the method has no Axum filter, or the
    /// same method and path (or an equivalent template with differently named
    /// parameters) is already registered.
    pub fn add_route(&mut self, prefix: &str, route: Route) -> Result<(), RouteError> {
        let path = join_path(prefix, route.path())?;
        MethodFilter::try_from(route.method().clone())
            .map_err(|_| RouteError::UnsupportedMethod(route.method().clone()))?;

        let shape = erase_params(&path);
        match self.shapes.get(&shape) {
            Some(existing) if *existing != path => {
                return Err(RouteError::Ambiguous {
                    path,
                    existing: existing.clone(),
                });
            }
            Some(_) => {}
            None => {
                self.shapes.insert(shape, path.clone());
            }
        }

        if !self.registered.insert((route.method().clone(), path.clone())) {
            return Err(RouteError::Duplicate {
                method: route.method().clone(),
                path,
            });
        }

        tracing::debug!(method = %route.method(), path = %path, "Route registered");
        self.routes.push(route.with_path(path));
        Ok(())
    }

    /// Registers every route of a controller under its prefix.
    pub fn mount<C: Controller>(&mut self, controller: Arc<C>) -> Result<(), RouteError> {
        let prefix = controller.prefix();
        for route in controller.routes() {
            self.add_route(prefix, route)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compiles the table into an Axum router.
    pub fn into_router(self) -> Router {
        let settings = self.settings;
        let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();

        for route in self.routes {
            let path = route.path().to_string();
            // checked in add_route
            let Ok(filter) = MethodFilter::try_from(route.method().clone()) else {
                continue;
            };
            let route = Arc::new(route);

            let handler = move |params: Result<Path<HashMap<String, String>>, PathRejection>,
                                request: Request| {
                let route = Arc::clone(&route);
                async move {
                    let params = params.map(|Path(p)| p).unwrap_or_default();
                    executor::execute(&route, request, params, &settings).await
                }
            };

            let entry = by_path.remove(&path).unwrap_or_default();
            by_path.insert(path, entry.on(filter, handler));
        }

        by_path
            .into_iter()
            .fold(Router::new(), |router, (path, methods)| {
                router.route(&path, methods.fallback(unregistered_method))
            })
            // body size is enforced while building the context
            .layer(DefaultBodyLimit::disable())
    }
}

/// A known path with an unregistered method is as unmatched as an unknown path.
async fn unregistered_method() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Joins a controller prefix and a route path into a normalized template.
fn join_path(prefix: &str, path: &str) -> Result<String, RouteError> {
    let mut joined = String::new();

    for segment in prefix.split('/').chain(path.split('/')) {
        if segment.is_empty() {
            continue;
        }
        joined.push('/');
        joined.push_str(&normalize_segment(segment, prefix, path)?);
    }

    if joined.is_empty() {
        joined.push('/');
    }
    Ok(joined)
}

fn normalize_segment(segment: &str, prefix: &str, path: &str) -> Result<String, RouteError> {
    let invalid = |reason| RouteError::InvalidPath {
        path: format!("{prefix}{path}"),
        reason,
    };

    let name = if let Some(name) = segment.strip_prefix(':') {
        name
    } else if let Some(inner) = segment.strip_prefix('{') {
        inner
            .strip_suffix('}')
            .ok_or_else(|| invalid("unterminated parameter"))?
    } else if segment.contains(['{', '}', ':', '*']) {
        return Err(invalid("parameters must span a whole segment"));
    } else {
        return Ok(segment.to_string());
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("parameter names must be alphanumeric"));
    }
    Ok(format!("{{{name}}}"))
}

/// `/users/{hostId}/avatar` -> `/users/{}/avatar`
fn erase_params(path: &str) -> String {
    path.split('/')
        .map(|s| if s.starts_with('{') { "{}" } else { s })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::rest::context::RequestContext;
    use axum::body::Body;
    use axum::response::{IntoResponse, Response};
    use tower::ServiceExt;

    async fn noop(_ctx: RequestContext) -> Result<Response, AppError> {
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn echo_param(ctx: RequestContext) -> Result<Response, AppError> {
        Ok(ctx.param("hostId").unwrap_or_default().to_string().into_response())
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/users", "/register").unwrap(), "/users/register");
        assert_eq!(join_path("/users", "/:hostId/avatar").unwrap(), "/users/{hostId}/avatar");
        assert_eq!(join_path("/users", "/{hostId}/avatar").unwrap(), "/users/{hostId}/avatar");
        assert_eq!(join_path("/offers", "/").unwrap(), "/offers");
        assert_eq!(join_path("", "/").unwrap(), "/");
    }

    #[test]
    fn test_join_path_rejects_bad_segments() {
        assert!(matches!(
            join_path("/users", "/{hostId/avatar"),
            Err(RouteError::InvalidPath { .. })
        ));
        assert!(matches!(
            join_path("/users", "/a:b"),
            Err(RouteError::InvalidPath { .. })
        ));
        assert!(matches!(
            join_path("/users", "/:"),
            Err(RouteError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/users", Route::post("/register", noop)).unwrap();

        let err = table
            .add_route("/users", Route::post("/register/", noop))
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::Duplicate {
                method: Method::POST,
                path: "/users/register".to_string()
            }
        );
    }

    #[test]
    fn test_colon_and_brace_forms_are_the_same_route() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/users", Route::post("/:hostId/avatar", noop)).unwrap();

        assert!(matches!(
            table.add_route("/users", Route::post("/{hostId}/avatar", noop)),
            Err(RouteError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_differently_named_params_are_ambiguous() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/offers", Route::get("/:offerId", noop)).unwrap();

        assert!(matches!(
            table.add_route("/offers", Route::delete("/:id", noop)),
            Err(RouteError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_same_path_different_methods() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/offers", Route::get("/:offerId", noop)).unwrap();
        table.add_route("/offers", Route::delete("/:offerId", noop)).unwrap();

        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_router_dispatches_with_params() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/users", Route::get("/:hostId", echo_param)).unwrap();
        let router = table.into_router();

        let response = router
            .oneshot(Request::builder().uri("/users/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body.as_ref(), b"abc");
    }

    #[tokio::test]
    async fn test_router_unknown_path_and_method() {
        let mut table = RouteTable::new(PipelineSettings::default());
        table.add_route("/users", Route::get("/profile", noop)).unwrap();
        let router = table.into_router();

        let missing = router
            .clone()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let wrong_method = router
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/users/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong_method.status(), StatusCode::NOT_FOUND);
    }
}
