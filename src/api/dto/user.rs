//! DTOs for user endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::Registration;
use crate::domain::entities::{Credentials, User, UserType};

/// Body of `POST /users/register`.
///
/// Missing fields fall back to their defaults so that validation, not
/// deserialization, reports them.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 15, message = "name must be 1 to 15 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 6, max = 12, message = "password must be 6 to 12 characters"))]
    pub password: String,

    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
}

impl From<CreateUserDto> for Registration {
    fn from(dto: CreateUserDto) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
            password: dto.password,
            user_type: dto.user_type.unwrap_or_default(),
        }
    }
}

/// Body of `POST /users/login`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginUserDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl From<LoginUserDto> for Credentials {
    fn from(dto: LoginUserDto) -> Self {
        Self {
            email: dto.email,
            password: dto.password,
        }
    }
}

/// Public view of a user. Carries no password material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRdo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<User> for UserRdo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            user_type: user.user_type,
        }
    }
}

/// Response of a successful login.
#[derive(Debug, Serialize)]
pub struct LoggedUserRdo {
    pub email: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObjectId;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_create_user_dto_defaults_type() {
        let dto: CreateUserDto = serde_json::from_value(json!({
            "name": "Keks",
            "email": "keks@example.com",
            "password": "secret1"
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        assert_eq!(Registration::from(dto).user_type, UserType::Regular);
    }

    #[test]
    fn test_create_user_dto_limits() {
        let dto: CreateUserDto = serde_json::from_value(json!({
            "name": "A name that is far too long",
            "email": "keks@example.com",
            "password": "123",
            "type": "pro"
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<CreateUserDto>(json!({"type": "admin"}));

        assert!(result.is_err());
    }

    #[test]
    fn test_user_rdo_has_no_secrets() {
        let user = User {
            id: ObjectId::new(),
            name: "Keks".to_string(),
            email: "keks@example.com".to_string(),
            avatar_url: Some("/upload/a.png".to_string()),
            user_type: UserType::Pro,
            password_hash: "deadbeef".to_string(),
            created_at: Utc::now(),
        };

        let body = serde_json::to_value(UserRdo::from(user)).unwrap();

        assert_eq!(body["avatarUrl"], "/upload/a.png");
        assert_eq!(body["type"], "pro");
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert!(!body.to_string().contains("deadbeef"));
    }
}
