//! Guard middlewares run before a route's handler.
//!
//! Each guard either lets the request continue (`Ok(())`) or short-circuits it
//! with an [`AppError`]. Guards may attach data to the [`RequestContext`] for
//! later steps, but never touch shared state besides the collaborators they
//! were configured with.
//!
//! | Variant | Rejects with | Attaches |
//! |---------|--------------|----------|
//! | [`ValidateDto`] | 400 + field details | validated DTO |
//! | [`ValidateObjectId`] | 400 | - |
//! | [`DocumentExists`] | 404 | - |
//! | [`UploadFile`] | 400 / 500 on write | stored file |
//! | [`Authenticate`] | 401 | caller identity |
//! | `Custom` | whatever the middleware returns | - |

mod authenticate;
mod document_exists;
mod upload_file;
mod validate_dto;
mod validate_object_id;

pub use authenticate::Authenticate;
pub use document_exists::{DocumentExists, DocumentLookup};
pub use upload_file::UploadFile;
pub use validate_dto::ValidateDto;
pub use validate_object_id::ValidateObjectId;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AppError;
use crate::rest::context::RequestContext;

/// Open extension point for steps that are not one of the built-in guards.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Label used as the failure origin on timeout and in logs.
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError>;
}

/// One step of a route's chain.
#[derive(Clone)]
pub enum Guard {
    ValidateDto(ValidateDto),
    ValidateObjectId(ValidateObjectId),
    DocumentExists(DocumentExists),
    UploadFile(UploadFile),
    Authenticate(Authenticate),
    Custom(Arc<dyn Middleware>),
}

impl Guard {
    pub fn custom(middleware: impl Middleware + 'static) -> Self {
        Self::Custom(Arc::new(middleware))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ValidateDto(_) => "ValidateDto",
            Self::ValidateObjectId(_) => "ValidateObjectId",
            Self::DocumentExists(_) => "DocumentExists",
            Self::UploadFile(_) => "UploadFile",
            Self::Authenticate(_) => "Authenticate",
            Self::Custom(middleware) => middleware.name(),
        }
    }

    /// Runs the guard against the in-flight request.
    pub async fn apply(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        match self {
            Self::ValidateDto(guard) => guard.execute(ctx),
            Self::ValidateObjectId(guard) => guard.execute(ctx),
            Self::DocumentExists(guard) => guard.execute(ctx).await,
            Self::UploadFile(guard) => guard.execute(ctx).await,
            Self::Authenticate(guard) => guard.execute(ctx).await,
            Self::Custom(middleware) => middleware.execute(ctx).await,
        }
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ValidateDto> for Guard {
    fn from(guard: ValidateDto) -> Self {
        Self::ValidateDto(guard)
    }
}

impl From<ValidateObjectId> for Guard {
    fn from(guard: ValidateObjectId) -> Self {
        Self::ValidateObjectId(guard)
    }
}

impl From<DocumentExists> for Guard {
    fn from(guard: DocumentExists) -> Self {
        Self::DocumentExists(guard)
    }
}

impl From<UploadFile> for Guard {
    fn from(guard: UploadFile) -> Self {
        Self::UploadFile(guard)
    }
}

impl From<Authenticate> for Guard {
    fn from(guard: Authenticate) -> Self {
        Self::Authenticate(guard)
    }
}
