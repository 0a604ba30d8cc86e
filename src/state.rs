use actix_web::web;
use std::sync::Arc;

use crate::auth::{AuthService, PasswordHasher, TokenCodec};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;

/// Shared, read-only services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenCodec>,
}

impl AppState {
    /// Wires the services over the given stores. Fails if the signing secret is empty.
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        jwt_secret: &str,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let tokens = TokenCodec::new(jwt_secret)?;
        let auth = AuthService::new(users, PasswordHasher::new(bcrypt_cost), tokens.clone())?;

        Ok(Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(tasks)),
            tokens: web::Data::new(tokens),
        })
    }

    pub fn from_config(
        config: &Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        Self::new(users, tasks, &config.jwt_secret, config.bcrypt_cost)
    }

    /// Registers the services as app data.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone());
    }
}
