//! Configuración del sistema
//!
//! Este módulo contiene la configuración del servidor y de la base de datos.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{ConfigError, EnvironmentConfig};
