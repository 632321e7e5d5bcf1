//! User entity and the identity derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::object_id::ObjectId;

/// Account kind. Pro hosts are highlighted in listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Regular,
    Pro,
}

/// A registered user (guest or host).
///
/// `password_hash` never leaves the application layer; response DTOs are built
/// from the other fields only.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity a token is issued for.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Input data for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub password_hash: String,
}

/// Login credentials as submitted by the client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Authenticated caller, resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ObjectId,
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_user() {
        let user = User {
            id: ObjectId::new(),
            name: "Keks".to_string(),
            email: "keks@example.com".to_string(),
            avatar_url: None,
            user_type: UserType::Pro,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };

        let identity = user.identity();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "keks@example.com");
        assert_eq!(identity.name, "Keks");
    }

    #[test]
    fn test_user_type_wire_names() {
        assert_eq!(serde_json::to_string(&UserType::Pro).unwrap(), "\"pro\"");
        assert_eq!(
            serde_json::from_str::<UserType>("\"regular\"").unwrap(),
            UserType::Regular
        );
    }
}
