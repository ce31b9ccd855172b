//! MOBZI API
//!
//! Backend REST para consultar rutas de transporte público por municipio:
//! municipios, rutas con paradas y horarios, empresas, rutas guardadas del
//! usuario y administración. Funciona sobre MySQL o PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
