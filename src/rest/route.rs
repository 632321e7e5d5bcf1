//! Route entries and handler type erasure.
//!
//! A [`Route`] is one `(method, path, guards, handler)` entry. Routes are
//! built by controllers at startup and never change afterwards.
//!
//! Handlers of different concrete types are stored behind
//! `Arc<dyn Handler>`. Any `Fn(RequestContext) -> impl Future<Output =
//! Result<Response, AppError>>` is a handler; controller methods of the form
//! `async fn(self: Arc<Self>, ctx: RequestContext)` become one via [`bind`].

use axum::http::Method;
use axum::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::AppError;
use crate::rest::context::RequestContext;
use crate::rest::guard::Guard;

/// Heap-allocated handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send + 'static>>;

/// The final step of a route, run only after every guard passed.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        Box::pin((self)(ctx))
    }
}

/// Turns a controller method into a handler bound to `controller`.
///
/// ```rust,ignore
/// Route::new(Method::POST, "/register", bind(&self, Self::create))
/// ```
pub fn bind<C, F, Fut>(controller: &Arc<C>, action: F) -> impl Handler
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
{
    let controller = Arc::clone(controller);
    move |ctx: RequestContext| action(Arc::clone(&controller), ctx)
}

/// One registered endpoint.
pub struct Route {
    method: Method,
    path: String,
    guards: Vec<Guard>,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
        Self {
            method,
            path: path.into(),
            guards: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn get(path: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::GET, path, handler)
    }

    pub fn post(path: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::POST, path, handler)
    }

    pub fn patch(path: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::PATCH, path, handler)
    }

    pub fn delete(path: impl Into<String>, handler: impl Handler) -> Self {
        Self::new(Method::DELETE, path, handler)
    }

    /// Appends a guard. Guards run in the order they are added.
    pub fn guard(mut self, guard: impl Into<Guard>) -> Self {
        self.guards.push(guard.into());
        self
    }

    /// Appends several guards, preserving their order.
    pub fn guards(mut self, guards: impl IntoIterator<Item = Guard>) -> Self {
        self.guards.extend(guards);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn chain(&self) -> &[Guard] {
        &self.guards
    }

    pub(crate) fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    pub(crate) fn with_path(mut self, path: String) -> Self {
        self.path = path;
        self
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field(
                "guards",
                &self.guards.iter().map(Guard::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::guard::ValidateObjectId;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    struct Greeter {
        greeting: &'static str,
    }

    impl Greeter {
        async fn greet(self: Arc<Self>, ctx: RequestContext) -> Result<Response, AppError> {
            let name = ctx.param("name").unwrap_or("stranger").to_string();
            Ok((StatusCode::OK, format!("{} {name}", self.greeting)).into_response())
        }
    }

    #[tokio::test]
    async fn test_bind_controller_method() {
        let greeter = Arc::new(Greeter { greeting: "hello" });
        let handler = bind(&greeter, Greeter::greet);

        let ctx = RequestContext::new(Method::GET, "/greet/keks").with_param("name", "keks");
        let response = handler.call(ctx).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_guards_keep_registration_order() {
        let route = Route::get("/:a/:b", |_ctx: RequestContext| async {
            Ok::<_, AppError>(StatusCode::NO_CONTENT.into_response())
        })
        .guard(ValidateObjectId::new("a"))
        .guard(ValidateObjectId::new("b"));

        let params: Vec<&str> = route
            .chain()
            .iter()
            .map(|g| match g {
                Guard::ValidateObjectId(v) => v.param(),
                _ => "",
            })
            .collect();

        assert_eq!(params, vec!["a", "b"]);
        assert_eq!(*route.method(), Method::GET);
    }
}
