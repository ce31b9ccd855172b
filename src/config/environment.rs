//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor, JWT, CORS, rate limiting
//! y logging. Todas las variables tienen un valor por defecto para desarrollo.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::utils::jwt::parse_expiration;

const DEFAULT_JWT_SECRET: &str = "change-this-secret-key";
const DEFAULT_REFRESH_SECRET: &str = "change-this-refresh-secret";

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Valor inválido para {key}: '{value}'")]
    Invalid { key: String, value: String },

    #[error("Tipo de base de datos no soportado: '{0}' (use mysql o postgresql)")]
    UnsupportedDatabase(String),
}

/// Configuración de tokens JWT
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expires_in: String,
    pub expires: Duration,
    pub refresh_secret: String,
    pub refresh_expires_in: String,
    pub refresh_expires: Duration,
    pub reset_secret: String,
    pub reset_expires: Duration,
}

/// Límites de peticiones por IP
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub window: Duration,
    pub max_requests: u32,
    pub auth_window: Duration,
    pub auth_max_requests: u32,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub api_version: String,
    pub jwt: JwtSettings,
    pub cors_origins: Vec<String>,
    pub cors_credentials: bool,
    pub rate_limit: RateLimitSettings,
    pub log_level: String,
    pub pwa_dir: String,
    pub request_timeout: Duration,
}

/// Lee una variable o usa el valor por defecto
pub(crate) fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Lee y convierte una variable, reportando el valor si no se puede interpretar
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
    }
}

fn duration_var<F>(lookup: &F, key: &str, default: &str) -> Result<(String, Duration), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = var_or(lookup, key, default);
    let duration = parse_expiration(&raw).ok_or_else(|| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.clone(),
    })?;
    Ok((raw, duration))
}

impl EnvironmentConfig {
    /// Construir la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración desde una fuente arbitraria de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = var_or(&lookup, "JWT_SECRET", DEFAULT_JWT_SECRET);
        let (expires_in, expires) = duration_var(&lookup, "JWT_EXPIRES_IN", "7d")?;
        let (refresh_expires_in, refresh_expires) =
            duration_var(&lookup, "JWT_REFRESH_EXPIRES_IN", "30d")?;
        let (_, reset_expires) = duration_var(&lookup, "PASSWORD_RESET_EXPIRES_IN", "1h")?;

        let jwt = JwtSettings {
            reset_secret: var_or(&lookup, "PASSWORD_RESET_SECRET", &secret),
            secret,
            expires_in,
            expires,
            refresh_secret: var_or(&lookup, "JWT_REFRESH_SECRET", DEFAULT_REFRESH_SECRET),
            refresh_expires_in,
            refresh_expires,
            reset_expires,
        };

        let rate_limit = RateLimitSettings {
            window: Duration::from_millis(parse_var(&lookup, "RATE_LIMIT_WINDOW_MS", 600_000u64)?),
            max_requests: parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS", 6_000u32)?,
            auth_window: Duration::from_millis(parse_var(
                &lookup,
                "RATE_LIMIT_AUTH_WINDOW_MS",
                900_000u64,
            )?),
            auth_max_requests: parse_var(&lookup, "RATE_LIMIT_AUTH_MAX_REQUESTS", 10u32)?,
        };

        let log_level = lookup("RUST_LOG")
            .or_else(|| lookup("LOG_LEVEL"))
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            environment: var_or(&lookup, "NODE_ENV", "development"),
            port: parse_var(&lookup, "PORT", 3001u16)?,
            host: var_or(&lookup, "HOST", "0.0.0.0"),
            api_version: var_or(&lookup, "API_VERSION", "v1"),
            jwt,
            cors_origins: var_or(&lookup, "CORS_ORIGIN", "http://localhost:3000")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cors_credentials: var_or(&lookup, "CORS_CREDENTIALS", "false") == "true",
            rate_limit,
            log_level,
            pwa_dir: var_or(&lookup, "PWA_DIR", "pwa"),
            request_timeout: Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?),
        })
    }

    /// Advertencias sobre configuración insegura o incompleta
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.jwt.secret == DEFAULT_JWT_SECRET {
            warnings.push(
                "JWT_SECRET no está configurado. Usando valor por defecto (INSEGURO)".to_string(),
            );
        }
        if self.jwt.refresh_secret == DEFAULT_REFRESH_SECRET {
            warnings.push(
                "JWT_REFRESH_SECRET no está configurado. Usando valor por defecto (INSEGURO)"
                    .to_string(),
            );
        }
        if self.cors_origins.iter().any(|o| o == "*") && self.cors_credentials {
            warnings.push(
                "CORS_ORIGIN='*' no es compatible con CORS_CREDENTIALS=true; se ignoran las credenciales"
                    .to_string(),
            );
        }

        warnings
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Dirección de escucha del servidor
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Prefijo de la API (`/api/v1`)
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}
