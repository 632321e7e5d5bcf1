#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{Value, json};
use six_cities::config::Config;
use six_cities::error::AppError;
use six_cities::rest::DocumentLookup;
use six_cities::routes::app_router;
use six_cities::state::AppState;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
        upload_directory: temp_upload_dir(),
        salt: "test-salt".to_string(),
        jwt_secret: "test-jwt-secret".to_string(),
        jwt_expires_in: Duration::from_secs(3600),
        request_timeout: Duration::from_secs(5),
        max_body_bytes: 1024 * 1024,
        max_upload_bytes: 64 * 1024,
    }
}

pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("six-cities-test-{}", uuid::Uuid::new_v4()))
}

/// True if nothing has been stored in the upload directory.
pub fn upload_dir_is_empty(state: &AppState) -> bool {
    match std::fs::read_dir(&state.config.upload_directory) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

pub fn create_test_state() -> AppState {
    AppState::new(test_config())
}

pub fn create_test_server(state: &AppState) -> TestServer {
    TestServer::new(app_router(state).unwrap()).unwrap()
}

pub fn registration(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "secret1",
        "type": "pro"
    })
}

/// Registers a user and returns its id.
pub async fn register_user(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/users/register")
        .json(&registration(name, email))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

/// Logs in with the password used by [`registration`] and returns the token.
pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/users/login")
        .json(&json!({ "email": email, "password": "secret1" }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

pub fn offer_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Bright flat with a view over the canal",
        "city": "Amsterdam",
        "offerType": "apartment",
        "isPremium": false,
        "price": 1200,
        "bedrooms": 2,
        "maxAdults": 4
    })
}

/// Lookup that counts calls and finds nothing.
#[derive(Default)]
pub struct SpyLookup {
    calls: AtomicUsize,
}

impl SpyLookup {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentLookup for SpyLookup {
    async fn exists(&self, _collection: &str, _id: &str) -> Result<bool, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}
