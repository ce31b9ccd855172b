//! Data Transfer Objects
//!
//! Formas de request/response de la API y sus reglas de validación.

pub mod admin_dto;
pub mod auth_dto;
pub mod profile_dto;
pub mod public_dto;
pub mod response_dto;

pub use response_dto::ApiResponse;
