//! Modelo de Ruta Guardada

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Ruta guardada por un usuario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RutaGuardada {
    pub id: String,
    pub usuario_id: String,
    pub ruta_id: String,
    pub nombre_personalizado: Option<String>,
    pub favorita: bool,
    pub fecha_creacion: Option<String>,
    pub fecha_actualizacion: Option<String>,
}

impl RutaGuardada {
    pub fn columns(kind: DatabaseKind, alias: &str) -> String {
        let c = |name: &str| format!("{}.{}", alias, name);
        format!(
            "{}, {}, {}, {}, {} AS favorita, {} AS fecha_creacion, {} AS fecha_actualizacion",
            c("id"),
            c("usuario_id"),
            c("ruta_id"),
            c("nombre_personalizado"),
            kind.flag(&c("favorita")),
            kind.text(&c("fecha_creacion")),
            kind.text(&c("fecha_actualizacion"))
        )
    }
}

impl<'r> FromRow<'r, AnyRow> for RutaGuardada {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            usuario_id: row.try_get("usuario_id")?,
            ruta_id: row.try_get("ruta_id")?,
            nombre_personalizado: row.try_get("nombre_personalizado")?,
            favorita: as_bool(row.try_get("favorita")?),
            fecha_creacion: row.try_get("fecha_creacion")?,
            fecha_actualizacion: row.try_get("fecha_actualizacion")?,
        })
    }
}

/// Ruta guardada con datos de la ruta, municipio y empresa
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RutaGuardadaDetalle {
    #[serde(flatten)]
    pub guardada: RutaGuardada,
    pub ruta_nombre: Option<String>,
    pub origen: Option<String>,
    pub destino: Option<String>,
    pub municipio_nombre: Option<String>,
    pub empresa_nombre: Option<String>,
}

impl<'r> FromRow<'r, AnyRow> for RutaGuardadaDetalle {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            guardada: RutaGuardada::from_row(row)?,
            ruta_nombre: row.try_get("ruta_nombre")?,
            origen: row.try_get("origen")?,
            destino: row.try_get("destino")?,
            municipio_nombre: row.try_get("municipio_nombre")?,
            empresa_nombre: row.try_get("empresa_nombre")?,
        })
    }
}
