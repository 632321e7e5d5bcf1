use serde::de::DeserializeOwned;
use serde_json::error::Category;
use validator::Validate;

use crate::error::{AppError, FieldViolation};
use crate::rest::context::RequestContext;

const ORIGIN: &str = "ValidateDto";

type Validator = fn(&mut RequestContext) -> Result<(), AppError>;

/// Parses the JSON body into `T`, validates it and swaps it into the context.
///
/// Unknown fields are dropped by deserialization. An empty body is read as
/// `{}` so that every missing required field is reported at once.
#[derive(Clone)]
pub struct ValidateDto {
    shape: &'static str,
    validate: Validator,
}

impl ValidateDto {
    pub fn new<T>() -> Self
    where
        T: DeserializeOwned + Validate + Send + Sync + 'static,
    {
        Self {
            shape: std::any::type_name::<T>(),
            validate: validate_into::<T>,
        }
    }

    /// Fully qualified name of the DTO type.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    pub(super) fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        (self.validate)(ctx)
    }
}

impl std::fmt::Debug for ValidateDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidateDto").field("shape", &self.shape).finish()
    }
}

fn validate_into<T>(ctx: &mut RequestContext) -> Result<(), AppError>
where
    T: DeserializeOwned + Validate + Send + Sync + 'static,
{
    let raw = ctx.raw_body().ok_or_else(|| {
        AppError::internal(anyhow::anyhow!("request body was already consumed"))
    })?;

    let body: &[u8] = if raw.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        raw
    };

    let dto: T = deserialize(body)?;

    dto.validate()?;

    ctx.set_dto(std::any::type_name::<T>(), dto);
    Ok(())
}

/// Syntax errors become a plain 400; values of the wrong type or shape are
/// reported against the field they were found in.
fn deserialize<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);

    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let inner = err.inner();
        if inner.classify() != Category::Data || err.path().iter().next().is_none() {
            return AppError::bad_request(format!("Invalid request body: {inner}"), ORIGIN);
        }

        let property = err.path().to_string();
        let message = inner.to_string();
        // serde_json appends the position, which the field path replaces
        let message = match message.rsplit_once(" at line ") {
            Some((head, _)) => head.to_string(),
            None => message,
        };

        AppError::validation(
            format!("Validation error: {property}"),
            ORIGIN,
            vec![FieldViolation {
                property,
                messages: vec![message],
            }],
        )
    })?;

    deserializer
        .end()
        .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}"), ORIGIN))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Validate)]
    #[serde(default, rename_all = "camelCase")]
    struct Signup {
        #[validate(email(message = "email must be a valid address"))]
        email: String,
        #[validate(length(min = 6, max = 12, message = "min length is 6, max is 12"))]
        password: String,
        #[validate(range(min = 1, max = 10, message = "maxAdults must be 1..10"))]
        max_adults: u8,
    }

    fn ctx_with(body: &str) -> RequestContext {
        RequestContext::new(Method::POST, "/users/register").with_body(body.to_string())
    }

    #[test]
    fn test_valid_body_replaces_raw() {
        let mut ctx = RequestContext::new(Method::POST, "/").with_json(&json!({
            "email": "keks@example.com",
            "password": "secret1",
            "maxAdults": 2,
            "isAdmin": true
        }));

        ValidateDto::new::<Signup>().execute(&mut ctx).unwrap();

        assert!(ctx.raw_body().is_none());
        let dto = ctx.take_dto::<Signup>().unwrap();
        assert_eq!(dto.email, "keks@example.com");
        assert_eq!(dto.max_adults, 2);
    }

    #[test]
    fn test_missing_field_is_listed() {
        let mut ctx = ctx_with(r#"{"password": "secret1", "maxAdults": 2}"#);

        let record = ValidateDto::new::<Signup>()
            .execute(&mut ctx)
            .unwrap_err()
            .to_record();

        assert_eq!(record.status.as_u16(), 400);
        assert_eq!(record.origin, "ValidateDto");
        assert_eq!(record.details.len(), 1);
        assert_eq!(record.details[0].property, "email");
        assert_eq!(record.details[0].messages, vec!["email must be a valid address"]);
        // raw body untouched on failure
        assert!(ctx.raw_body().is_some());
    }

    #[test]
    fn test_empty_body_reports_every_field() {
        let mut ctx = ctx_with("");

        let record = ValidateDto::new::<Signup>()
            .execute(&mut ctx)
            .unwrap_err()
            .to_record();

        let fields: Vec<&str> = record.details.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(fields, vec!["email", "maxAdults", "password"]);
        assert_eq!(record.message, "Validation error: email, maxAdults, password");
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let mut ctx = ctx_with("{not json");

        let err = ValidateDto::new::<Signup>().execute(&mut ctx).unwrap_err();

        assert!(matches!(err, AppError::Validation { ref details, .. } if details.is_empty()));
    }

    #[test]
    fn test_non_object_body_is_bad_request() {
        for body in [r#""just a string""#, r#"{"email": "a@b.c"} trailing"#] {
            let mut ctx = ctx_with(body);

            let record = ValidateDto::new::<Signup>()
                .execute(&mut ctx)
                .unwrap_err()
                .to_record();

            assert_eq!(record.status.as_u16(), 400, "body {body}");
            assert!(record.details.is_empty(), "body {body}");
        }
    }

    #[test]
    fn test_wrong_type_names_the_field() {
        let mut ctx = ctx_with(r#"{"email": "a@b.c", "password": "secret1", "maxAdults": "two"}"#);

        let record = ValidateDto::new::<Signup>()
            .execute(&mut ctx)
            .unwrap_err()
            .to_record();

        assert_eq!(record.status.as_u16(), 400);
        assert_eq!(record.origin, "ValidateDto");
        assert_eq!(record.message, "Validation error: maxAdults");
        assert_eq!(record.details.len(), 1);
        assert_eq!(record.details[0].property, "maxAdults");
        assert!(record.details[0].messages[0].starts_with("invalid type: string \"two\""));
        assert!(!record.details[0].messages[0].contains("line"));
        assert!(ctx.raw_body().is_some());
    }

    #[test]
    fn test_non_string_email_names_the_field() {
        let mut ctx = ctx_with(r#"{"email": 42, "password": "secret1", "maxAdults": 2}"#);

        let record = ValidateDto::new::<Signup>()
            .execute(&mut ctx)
            .unwrap_err()
            .to_record();

        assert_eq!(record.details.len(), 1);
        assert_eq!(record.details[0].property, "email");
    }
}
