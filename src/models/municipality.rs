//! Modelo de Municipio

use serde::Serialize;
use sqlx::FromRow;

use crate::database::DatabaseKind;

/// Municipio activo con su centro geográfico
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Municipio {
    pub id: String,
    pub nombre: String,
    pub centro_lng: f64,
    pub centro_lat: f64,
}

impl Municipio {
    /// Columnas de `municipios` con tipos neutrales
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "id, nombre, {} AS centro_lng, {} AS centro_lat",
            kind.num("centro_lng"),
            kind.num("centro_lat")
        )
    }
}
