//! Failure taxonomy and the error-to-response mapping.
//!
//! Every failure raised by a guard or a handler is an [`AppError`]. The chain
//! executor never renders errors itself: it hands them to
//! [`AppError::into_response`], which is the only place where a failure turns
//! into a wire response.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "message": "Validation error: email",
//!   "origin": "ValidateDto",
//!   "details": [{ "property": "email", "messages": ["email must be a valid address"] }]
//! }
//! ```
//!
//! `details` is present only for validation failures. Unexpected failures
//! ([`AppError::Internal`]) are logged with their full cause chain and rendered
//! with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Origin label used for failures that carry no origin of their own.
pub const INTERNAL_ORIGIN: &str = "App";

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub property: String,
    pub messages: Vec<String>,
}

/// Application failure raised anywhere in the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input (400).
    #[error("{message}")]
    Validation {
        message: String,
        origin: String,
        details: Vec<FieldViolation>,
    },

    /// Referenced resource does not exist (404).
    #[error("{message}")]
    NotFound { message: String, origin: String },

    /// Missing or invalid credentials (401).
    #[error("{message}")]
    Unauthorized { message: String, origin: String },

    /// Authenticated but not allowed (403).
    #[error("{message}")]
    Forbidden { message: String, origin: String },

    /// Resource already exists (409).
    #[error("{message}")]
    Conflict { message: String, origin: String },

    /// Request deadline elapsed while `origin` was running (503).
    #[error("request deadline exceeded in {origin}")]
    Timeout { origin: String },

    /// Anything unexpected (500). Never rendered verbatim.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            origin: origin.into(),
            details: Vec::new(),
        }
    }

    pub fn validation(
        message: impl Into<String>,
        origin: impl Into<String>,
        details: Vec<FieldViolation>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            origin: origin.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            origin: origin.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            origin: origin.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            origin: origin.into(),
        }
    }

    pub fn conflict(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            origin: origin.into(),
        }
    }

    pub fn timeout(origin: impl Into<String>) -> Self {
        Self::Timeout {
            origin: origin.into(),
        }
    }

    /// Wraps an unexpected failure. The message is logged, never sent.
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }

    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the failure record sent to the client.
    ///
    /// Internal failures are reduced to a generic record so no infrastructure
    /// detail leaks into the response.
    pub fn to_record(&self) -> FailureRecord {
        let status = self.status();
        let (message, origin, details) = match self {
            Self::Validation {
                message,
                origin,
                details,
            } => (message.clone(), origin.clone(), details.clone()),
            Self::NotFound { message, origin }
            | Self::Unauthorized { message, origin }
            | Self::Forbidden { message, origin }
            | Self::Conflict { message, origin } => (message.clone(), origin.clone(), Vec::new()),
            Self::Timeout { origin } => (
                "Request processing timed out".to_string(),
                origin.clone(),
                Vec::new(),
            ),
            Self::Internal(_) => (
                "Internal Server Error".to_string(),
                INTERNAL_ORIGIN.to_string(),
                Vec::new(),
            ),
        };

        FailureRecord {
            status,
            message,
            origin,
            details,
        }
    }
}

/// Structured description of why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let record = self.to_record();

        if record.status.is_server_error() {
            tracing::error!(
                status = record.status.as_u16(),
                origin = %record.origin,
                error = ?self,
                "request failed"
            );
        } else {
            tracing::debug!(
                status = record.status.as_u16(),
                origin = %record.origin,
                message = %record.message,
                "request rejected"
            );
        }

        (record.status, Json(record)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = collect_violations(&errors, None);
        let fields: Vec<&str> = details.iter().map(|v| v.property.as_str()).collect();
        let message = format!("Validation error: {}", fields.join(", "));

        AppError::validation(message, "ValidateDto", details)
    }
}

/// Flattens (possibly nested) validator output into sorted field violations.
fn collect_violations(errors: &ValidationErrors, prefix: Option<&str>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for (field, kind) in errors.errors() {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{}", to_camel_case(field)),
            None => to_camel_case(field),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{name} failed `{}` constraint", e.code),
                    })
                    .collect();
                violations.push(FieldViolation {
                    property: name,
                    messages,
                });
            }
            ValidationErrorsKind::Struct(nested) => {
                violations.extend(collect_violations(nested, Some(&name)));
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item = format!("{name}[{index}]");
                    violations.extend(collect_violations(nested, Some(&item)));
                }
            }
        }
    }

    violations.sort_by(|a, b| a.property.cmp(&b.property));
    violations
}

/// DTO structs use `rename_all = "camelCase"`; report fields the way the client sent them.
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
