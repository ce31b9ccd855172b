//! Modelo de Horario
//!
//! `salidas` se guarda como arreglo JSON de horas `"HH:MM"`. Un valor que no
//! se pueda interpretar como arreglo de cadenas se lee como lista vacía.

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};
use tracing::warn;

use crate::database::dialect::{as_bool, DatabaseKind};

/// Horario de salidas para un día
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Horario {
    pub id: i64,
    pub ruta_id: String,
    pub dia: String,
    pub salidas: Vec<String>,
    pub activo: bool,
}

/// Horario a insertar
#[derive(Debug, Clone)]
pub struct NuevoHorario {
    pub dia: String,
    pub salidas: Vec<String>,
}

impl Horario {
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "{} AS id, ruta_id, dia, {} AS salidas, {} AS activo",
            kind.int("id"),
            kind.text("salidas"),
            kind.flag("activo")
        )
    }
}

impl<'r> FromRow<'r, AnyRow> for Horario {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let raw: Option<String> = row.try_get("salidas")?;
        Ok(Self {
            id: row.try_get("id")?,
            ruta_id: row.try_get("ruta_id")?,
            dia: row.try_get("dia")?,
            salidas: parse_salidas(raw.as_deref()),
            activo: as_bool(row.try_get("activo")?),
        })
    }
}

/// Interpreta la columna `salidas`
pub fn parse_salidas(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(salidas) => salidas,
        Err(e) => {
            warn!("⚠️ Salidas con formato inválido ({}): {}", e, raw);
            Vec::new()
        }
    }
}
