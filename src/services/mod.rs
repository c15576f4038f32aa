//! Business logic services

pub mod auth;
pub mod catalog;
pub mod email;
pub mod lending;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    lending::SystemClock,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub email: email::EmailService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let email = email::EmailService::new(config.email.clone());

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone(), email.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.clone()),
            lending: lending::LendingService::new(
                Arc::new(repository.copies.clone()),
                Arc::new(SystemClock),
            ),
            email,
            repository,
        }
    }
}
