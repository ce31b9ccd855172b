//! Modelo de Empresa
//!
//! Empresas de transporte que operan rutas dentro de un municipio.

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Empresa - mapea a la tabla empresas
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    pub id: String,
    pub nombre: String,
    pub municipio_id: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub activa: bool,
    pub fecha_creacion: Option<String>,
    pub fecha_actualizacion: Option<String>,
}

/// Datos para crear o reemplazar una empresa
#[derive(Debug, Clone)]
pub struct EmpresaData {
    pub nombre: String,
    pub municipio_id: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub activa: bool,
}

impl Empresa {
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "id, nombre, municipio_id, telefono, email, {} AS activa, \
             {} AS fecha_creacion, {} AS fecha_actualizacion",
            kind.flag("activa"),
            kind.text("fecha_creacion"),
            kind.text("fecha_actualizacion")
        )
    }
}

impl<'r> FromRow<'r, AnyRow> for Empresa {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            municipio_id: row.try_get("municipio_id")?,
            telefono: row.try_get("telefono")?,
            email: row.try_get("email")?,
            activa: as_bool(row.try_get("activa")?),
            fecha_creacion: row.try_get("fecha_creacion")?,
            fecha_actualizacion: row.try_get("fecha_actualizacion")?,
        })
    }
}

/// Proyección pública `{ id, nombre }`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmpresaResumen {
    pub id: String,
    pub nombre: String,
}
