//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and then shared
//! read-only as `Arc<Config>`.
//!
//! ## Required Variables
//!
//! - `SALT` - Password hashing salt
//! - `JWT_SECRET` - Session token signing secret
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:4000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `UPLOAD_DIRECTORY` - Where uploaded files are stored (default: `upload`)
//! - `JWT_EXPIRES_IN_SECS` - Session token lifetime (default: 172800, two days)
//! - `REQUEST_TIMEOUT_SECS` - Per-request deadline (default: 30)
//! - `MAX_BODY_BYTES` - Request body cap (default: 10 MiB)
//! - `MAX_UPLOAD_BYTES` - Single uploaded file cap (default: 5 MiB)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub upload_directory: PathBuf,
    /// Salt for password hashing. Changing it invalidates every stored password.
    pub salt: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric one
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let upload_directory = env::var("UPLOAD_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("upload"));

        let salt = env::var("SALT").context("SALT must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let jwt_expires_in = Duration::from_secs(parse_or("JWT_EXPIRES_IN_SECS", 172_800)?);
        let request_timeout = Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 30)?);
        let max_body_bytes = parse_or("MAX_BODY_BYTES", 10 * 1024 * 1024)?;
        let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?;

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            upload_directory,
            salt,
            jwt_secret,
            jwt_expires_in,
            request_timeout,
            max_body_bytes,
            max_upload_bytes,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - a secret is empty
    /// - a timeout or size limit is zero
    /// - an upload cannot fit in a request body
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.salt.is_empty() {
            anyhow::bail!("SALT must not be empty");
        }
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        if self.upload_directory.as_os_str().is_empty() {
            anyhow::bail!("UPLOAD_DIRECTORY must not be empty");
        }

        if self.jwt_expires_in.is_zero() {
            anyhow::bail!("JWT_EXPIRES_IN_SECS must be greater than 0");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if self.max_body_bytes == 0 || self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES and MAX_UPLOAD_BYTES must be greater than 0");
        }
        if self.max_upload_bytes > self.max_body_bytes {
            anyhow::bail!(
                "MAX_UPLOAD_BYTES ({}) cannot exceed MAX_BODY_BYTES ({})",
                self.max_upload_bytes,
                self.max_body_bytes
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Upload directory: {}", self.upload_directory.display());
        tracing::info!("  Salt: {}", mask_secret(&self.salt));
        tracing::info!("  JWT secret: {}", mask_secret(&self.jwt_secret));
        tracing::info!("  JWT lifetime: {}s", self.jwt_expires_in.as_secs());
        tracing::info!("  Request timeout: {}s", self.request_timeout.as_secs());
        tracing::info!(
            "  Body limit: {} bytes (uploads: {} bytes)",
            self.max_body_bytes,
            self.max_upload_bytes
        );
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Masks a secret for logging, keeping only its length visible.
///
/// - `""` → `<empty>`
/// - `"supersecret"` → `*** (11 chars)`
fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "<empty>".to_string()
    } else {
        format!("*** ({} chars)", secret.chars().count())
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
