//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean a las tablas de la
//! base de datos. Cada modelo expone sus columnas ya adaptadas al dialecto.

pub mod company;
pub mod municipality;
pub mod preferences;
pub mod route;
pub mod saved_route;
pub mod schedule;
pub mod search_log;
pub mod stats;
pub mod stop;
pub mod user;
