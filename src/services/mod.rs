//! Servicios de negocio
//!
//! Emisión y verificación de tokens JWT.

pub mod jwt_service;

pub use jwt_service::{Claims, JwtService};
