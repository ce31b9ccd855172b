//! Controladores: reglas de negocio por área

pub mod admin_controller;
pub mod auth_controller;
pub mod profile_controller;
pub mod public_controller;
