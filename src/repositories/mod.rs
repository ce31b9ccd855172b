//! Repositorios de acceso a datos
//!
//! Cada repositorio emite SQL parametrizado con placeholders `?` que
//! `DatabaseConnection::sql` adapta al dialecto activo.

pub mod company_repository;
pub mod municipality_repository;
pub mod preferences_repository;
pub mod route_repository;
pub mod saved_route_repository;
pub mod schedule_repository;
pub mod search_repository;
pub mod stop_repository;
pub mod user_repository;
