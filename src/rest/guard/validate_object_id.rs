use crate::domain::ObjectId;
use crate::error::AppError;
use crate::rest::context::RequestContext;

/// Rejects requests whose path parameter is not a 24-hex-char object id.
///
/// Never touches storage, so it belongs before [`super::DocumentExists`].
#[derive(Debug, Clone)]
pub struct ValidateObjectId {
    param: &'static str,
}

impl ValidateObjectId {
    pub fn new(param: &'static str) -> Self {
        Self { param }
    }

    pub fn param(&self) -> &'static str {
        self.param
    }

    pub(super) fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        let value = ctx.param(self.param).unwrap_or_default();

        if ObjectId::is_valid(value) {
            Ok(())
        } else {
            Err(AppError::bad_request(
                format!("`{value}` is invalid ObjectID"),
                "ValidateObjectId",
            ))
        }
    }
}
