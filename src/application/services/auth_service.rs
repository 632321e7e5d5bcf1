//! Credential verification and session tokens.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ObjectId;
use crate::domain::entities::{Credentials, Identity, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::crypto::verify_password;

const ORIGIN: &str = "AuthService";

/// Authentication boundary used by the login route and the
/// [`crate::rest::guard::Authenticate`] guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Checks login credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email or a wrong
    /// password.
    async fn verify(&self, credentials: &Credentials) -> Result<User, AppError>;

    /// Issues a session token for `user`.
    async fn authenticate(&self, user: &User) -> Result<String, AppError>;

    /// Turns a session token back into the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, forged or
    /// expired.
    async fn resolve(&self, token: &str) -> Result<Identity, AppError>;
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// [`AuthService`] issuing HS256-signed JWTs.
pub struct JwtAuthService<R: UserRepository> {
    users: Arc<R>,
    salt: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl<R: UserRepository> JwtAuthService<R> {
    /// # Arguments
    ///
    /// - `users` - repository used to look up login emails
    /// - `salt` - password salt; must match the one used at registration
    /// - `secret` - token signing secret
    /// - `expires_in` - token lifetime
    pub fn new(users: Arc<R>, salt: String, secret: &str, expires_in: Duration) -> Self {
        Self {
            users,
            salt,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }
}

#[async_trait]
impl<R: UserRepository> AuthService for JwtAuthService<R> {
    async fn verify(&self, credentials: &Credentials) -> Result<User, AppError> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(format!("User with {} not found.", credentials.email), ORIGIN)
            })?;

        if !verify_password(&credentials.password, &self.salt, &user.password_hash) {
            return Err(AppError::unauthorized("Incorrect user name or password", ORIGIN));
        }

        Ok(user)
    }

    async fn authenticate(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_hex(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now,
            exp: now + self.expires_in.as_secs() as i64,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::Error::new(e).context("failed to sign token")))?;

        tracing::debug!(user_id = %user.id, "Session token issued");
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Identity, AppError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::unauthorized("Invalid or expired token", ORIGIN)
        })?;

        let id: ObjectId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid or expired token", ORIGIN))?;

        Ok(Identity {
            id,
            email: data.claims.email,
            name: data.claims.name,
        })
    }
}
