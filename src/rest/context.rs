//! Per-request context threaded through the guard chain.
//!
//! A [`RequestContext`] is built once per matched request, mutated by guards in
//! registration order and finally consumed by the handler. Guards attach what
//! they produce (validated DTO, stored upload, resolved identity); handlers
//! take it back out with the typed accessors.

use axum::body::Bytes;
use axum::extract::{Query, Request};
use axum::http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method, header};
use std::any::Any;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::rest::route_table::PipelineSettings;

const ORIGIN: &str = "RequestContext";

/// Deadline applied to contexts fabricated outside the server.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

enum Body {
    Raw(Bytes),
    Validated {
        shape: &'static str,
        value: Box<dyn Any + Send + Sync>,
    },
}

/// A file accepted by the upload guard and written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Form field the file arrived in.
    pub field: String,
    /// Client-side file name, if the client sent one.
    pub original_name: Option<String>,
    pub content_type: String,
    /// Randomized name the file was stored under.
    pub stored_name: String,
    /// Full path of the stored file.
    pub path: PathBuf,
    pub size: usize,
}

/// The in-flight request as seen by guards and handlers.
pub struct RequestContext {
    method: Method,
    path: String,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    headers: HeaderMap,
    extensions: Extensions,
    body: Body,
    files: HashMap<String, UploadedFile>,
    identity: Option<Identity>,
    deadline: Instant,
}

impl RequestContext {
    /// Fabricates an empty context, mainly for exercising guards in isolation.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            extensions: Extensions::new(),
            body: Body::Raw(Bytes::new()),
            files: HashMap::new(),
            identity: None,
            deadline: Instant::now() + DEFAULT_DEADLINE,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Raw(body.into());
        self
    }

    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .with_body(value.to_string())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = deadline;
        self
    }

    /// Builds the context for a matched route, buffering the body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the query string cannot be parsed
    /// or the body is unreadable or exceeds `max_body_bytes`, and
    /// [`AppError::Timeout`] if reading the body outlives the deadline.
    pub(crate) async fn from_request(
        request: Request,
        params: HashMap<String, String>,
        settings: &PipelineSettings,
    ) -> Result<Self, AppError> {
        let deadline = Instant::now() + settings.request_timeout;
        let (parts, body) = request.into_parts();

        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::bad_request(format!("Invalid query string: {e}"), ORIGIN))?;

        let body = tokio::time::timeout_at(
            deadline,
            axum::body::to_bytes(body, settings.max_body_bytes),
        )
        .await
        .map_err(|_| AppError::timeout(ORIGIN))?
        .map_err(|_| {
            AppError::bad_request(
                format!(
                    "Request body is unreadable or larger than {} bytes",
                    settings.max_body_bytes
                ),
                ORIGIN,
            )
        })?;

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            params,
            query,
            headers: parts.headers,
            extensions: parts.extensions,
            body: Body::Raw(body),
            files: HashMap::new(),
            identity: None,
            deadline,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:hostId/avatar`, `ctx.param("hostId")` on
    /// `/users/42/avatar` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Extensions inserted by outer layers, kept for re-running extractors.
    pub(crate) fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// The unparsed body, or `None` once a DTO guard has replaced it.
    pub fn raw_body(&self) -> Option<&Bytes> {
        match &self.body {
            Body::Raw(bytes) => Some(bytes),
            Body::Validated { .. } => None,
        }
    }

    /// Replaces the raw body with a validated DTO.
    pub fn set_dto<T: Send + Sync + 'static>(&mut self, shape: &'static str, value: T) {
        self.body = Body::Validated {
            shape,
            value: Box::new(value),
        };
    }

    pub fn dto<T: 'static>(&self) -> Option<&T> {
        match &self.body {
            Body::Validated { value, .. } => value.downcast_ref::<T>(),
            Body::Raw(_) => None,
        }
    }

    /// Takes the validated DTO out of the context.
    ///
    /// # Errors
    ///
    /// A missing or differently-typed DTO means the route was registered
    /// without the matching validation guard; that is reported as
    /// [`AppError::Internal`].
    pub fn take_dto<T: 'static>(&mut self) -> Result<T, AppError> {
        let wanted = std::any::type_name::<T>();

        match std::mem::replace(&mut self.body, Body::Raw(Bytes::new())) {
            Body::Validated { shape, value } => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => {
                    self.body = Body::Validated { shape, value };
                    Err(AppError::internal(anyhow::anyhow!(
                        "route expected DTO `{wanted}` but `{shape}` was validated"
                    )))
                }
            },
            raw @ Body::Raw(_) => {
                self.body = raw;
                Err(AppError::internal(anyhow::anyhow!(
                    "route expected DTO `{wanted}` but no validation guard ran"
                )))
            }
        }
    }

    pub fn attach_file(&mut self, file: UploadedFile) {
        self.files.insert(file.field.clone(), file);
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.get(field)
    }

    /// Takes an uploaded file out of the context.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no upload guard stored a file for `field`.
    pub fn take_file(&mut self, field: &str) -> Result<UploadedFile, AppError> {
        self.files.remove(field).ok_or_else(|| {
            AppError::internal(anyhow::anyhow!(
                "route expected an upload in field `{field}` but no upload guard ran"
            ))
        })
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The caller's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if no identity was resolved.
    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::unauthorized("Unauthorized", ORIGIN))
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}
