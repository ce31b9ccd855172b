//! Módulo de base de datos
//!
//! Conexión, pool y adaptación de consultas para MySQL y PostgreSQL.

pub mod connection;
pub mod dialect;

pub use connection::DatabaseConnection;
pub use dialect::DatabaseKind;
