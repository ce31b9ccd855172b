//! Modelo de Parada

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Parada de una ruta, ordenada por `orden`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parada {
    pub id: i64,
    pub ruta_id: String,
    pub nombre: String,
    pub orden: i64,
    pub coordenada_lng: f64,
    pub coordenada_lat: f64,
    pub activa: bool,
}

/// Parada a insertar
#[derive(Debug, Clone, PartialEq)]
pub struct NuevaParada {
    pub nombre: String,
    pub orden: i64,
    pub coordenada_lng: f64,
    pub coordenada_lat: f64,
}

impl Parada {
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "{} AS id, ruta_id, nombre, {} AS orden, {} AS coordenada_lng, \
             {} AS coordenada_lat, {} AS activa",
            kind.int("id"),
            kind.int("orden"),
            kind.num("coordenada_lng"),
            kind.num("coordenada_lat"),
            kind.flag("activa")
        )
    }

    /// Par `[lng, lat]`
    pub fn coordenada(&self) -> [f64; 2] {
        [self.coordenada_lng, self.coordenada_lat]
    }
}

impl<'r> FromRow<'r, AnyRow> for Parada {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            ruta_id: row.try_get("ruta_id")?,
            nombre: row.try_get("nombre")?,
            orden: row.try_get("orden")?,
            coordenada_lng: row.try_get("coordenada_lng")?,
            coordenada_lat: row.try_get("coordenada_lat")?,
            activa: as_bool(row.try_get("activa")?),
        })
    }
}

/// Combina nombres y coordenadas `[lng, lat]` en paradas numeradas desde 1
pub fn zip_paradas(nombres: &[String], coordenadas: &[[f64; 2]]) -> Vec<NuevaParada> {
    nombres
        .iter()
        .zip(coordenadas)
        .enumerate()
        .map(|(i, (nombre, [lng, lat]))| NuevaParada {
            nombre: nombre.trim().to_string(),
            orden: i as i64 + 1,
            coordenada_lng: *lng,
            coordenada_lat: *lat,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_paradas_numbers_from_one() {
        let nombres = vec!["Centro".to_string(), " Terminal ".to_string()];
        let coords = vec![[-103.35, 20.67], [-103.40, 20.70]];
        let paradas = zip_paradas(&nombres, &coords);

        assert_eq!(paradas.len(), 2);
        assert_eq!(paradas[0].orden, 1);
        assert_eq!(paradas[1].orden, 2);
        assert_eq!(paradas[1].nombre, "Terminal");
        assert_eq!(paradas[1].coordenada_lng, -103.40);
        assert_eq!(paradas[1].coordenada_lat, 20.70);
    }
}
