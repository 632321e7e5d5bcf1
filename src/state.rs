//! Composition root: every collaborator is constructed here once.

use std::sync::Arc;

use crate::application::services::{AuthService, JwtAuthService, OfferService, UserService};
use crate::config::Config;
use crate::infrastructure::memory::{InMemoryOfferRepository, InMemoryUserRepository};

/// Shared application services, cloned cheaply into controllers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
    pub offer_service: Arc<OfferService<InMemoryOfferRepository>>,
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    /// Wires repositories and services from an already validated config.
    pub fn new(config: Config) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let offers = Arc::new(InMemoryOfferRepository::new());

        let user_service = Arc::new(UserService::new(users.clone(), config.salt.clone()));
        let offer_service = Arc::new(OfferService::new(offers));
        let auth_service: Arc<dyn AuthService> = Arc::new(JwtAuthService::new(
            users,
            config.salt.clone(),
            &config.jwt_secret,
            config.jwt_expires_in,
        ));

        Self {
            config: Arc::new(config),
            user_service,
            offer_service,
            auth_service,
        }
    }
}
