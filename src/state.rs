//! Estado compartido de la aplicación
//!
//! Este módulo define el estado que se pasa a través del router de Axum.
//! Clonarlo es barato: todo vive detrás de `Arc` o del pool.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::database::DatabaseConnection;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: Arc<JwtService>,
    pub rate_limit: RateLimitState,
    pub auth_rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: EnvironmentConfig) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let rate_limit = RateLimitState::new(
            config.rate_limit.max_requests,
            config.rate_limit.window,
        );
        let auth_rate_limit = RateLimitState::new(
            config.rate_limit.auth_max_requests,
            config.rate_limit.auth_window,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            rate_limit,
            auth_rate_limit,
        }
    }
}
