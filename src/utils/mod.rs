//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! contraseñas, JWT, extractores de axum y generación de identificadores.

pub mod errors;
pub mod extract;
pub mod ids;
pub mod jwt;
pub mod password;
pub mod validation;
