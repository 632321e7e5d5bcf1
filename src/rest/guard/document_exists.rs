use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AppError;
use crate::rest::context::RequestContext;

/// Existence check used by [`DocumentExists`].
///
/// Implementations return `Ok(false)` for unknown or unparsable ids and fail
/// only on infrastructure errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, AppError>;
}

/// Rejects requests referring to a document that does not exist.
///
/// The only guard with a storage round-trip; register it after
/// [`super::ValidateObjectId`] for the same parameter.
#[derive(Clone)]
pub struct DocumentExists {
    lookup: Arc<dyn DocumentLookup>,
    entity: &'static str,
    param: &'static str,
}

impl DocumentExists {
    /// `entity` names both the collection and the entity in the 404 message.
    pub fn new(lookup: Arc<dyn DocumentLookup>, entity: &'static str, param: &'static str) -> Self {
        Self {
            lookup,
            entity,
            param,
        }
    }

    pub(super) async fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        let id = ctx.param(self.param).unwrap_or_default();

        if self.lookup.exists(self.entity, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                format!("{} with {id} not found.", self.entity),
                "DocumentExists",
            ))
        }
    }
}
