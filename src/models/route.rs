//! Modelo de Ruta
//!
//! Este módulo contiene la ruta de transporte, su variante con nombres de
//! municipio y empresa para administración, y los datos de escritura.

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Ruta - mapea a la tabla rutas
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ruta {
    pub id: String,
    pub nombre: String,
    pub origen: String,
    pub destino: String,
    pub municipio_id: String,
    pub empresa_id: String,
    pub costo_minimo: f64,
    pub costo_maximo: f64,
    pub moneda: String,
    pub duracion: Option<String>,
    pub frecuencia: Option<String>,
    pub usuarios_registrados: i64,
    pub activa: bool,
    pub notas: Option<String>,
    pub fecha_creacion: Option<String>,
    pub fecha_actualizacion: Option<String>,
}

impl Ruta {
    /// Columnas de `rutas` con el alias de tabla indicado
    pub fn columns(kind: DatabaseKind, alias: &str) -> String {
        let c = |name: &str| format!("{}.{}", alias, name);
        format!(
            "{id}, {nombre}, {origen}, {destino}, {municipio}, {empresa}, \
             {cmin} AS costo_minimo, {cmax} AS costo_maximo, {moneda}, {duracion}, {frecuencia}, \
             {usuarios} AS usuarios_registrados, {activa} AS activa, {notas}, \
             {creacion} AS fecha_creacion, {actualizacion} AS fecha_actualizacion",
            id = c("id"),
            nombre = c("nombre"),
            origen = c("origen"),
            destino = c("destino"),
            municipio = c("municipio_id"),
            empresa = c("empresa_id"),
            cmin = kind.num(&c("costo_minimo")),
            cmax = kind.num(&c("costo_maximo")),
            moneda = c("moneda"),
            duracion = c("duracion"),
            frecuencia = c("frecuencia"),
            usuarios = kind.int(&format!("COALESCE({}, 0)", c("usuarios_registrados"))),
            activa = kind.flag(&c("activa")),
            notas = c("notas"),
            creacion = kind.text(&c("fecha_creacion")),
            actualizacion = kind.text(&c("fecha_actualizacion")),
        )
    }
}

impl<'r> FromRow<'r, AnyRow> for Ruta {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            origen: row.try_get("origen")?,
            destino: row.try_get("destino")?,
            municipio_id: row.try_get("municipio_id")?,
            empresa_id: row.try_get("empresa_id")?,
            costo_minimo: row.try_get("costo_minimo")?,
            costo_maximo: row.try_get("costo_maximo")?,
            moneda: row.try_get("moneda")?,
            duracion: row.try_get("duracion")?,
            frecuencia: row.try_get("frecuencia")?,
            usuarios_registrados: row.try_get("usuarios_registrados")?,
            activa: as_bool(row.try_get("activa")?),
            notas: row.try_get("notas")?,
            fecha_creacion: row.try_get("fecha_creacion")?,
            fecha_actualizacion: row.try_get("fecha_actualizacion")?,
        })
    }
}

/// Ruta con los nombres de su municipio y empresa
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RutaConNombres {
    #[serde(flatten)]
    pub ruta: Ruta,
    pub municipio_nombre: Option<String>,
    pub empresa_nombre: Option<String>,
}

impl<'r> FromRow<'r, AnyRow> for RutaConNombres {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            ruta: Ruta::from_row(row)?,
            municipio_nombre: row.try_get("municipio_nombre")?,
            empresa_nombre: row.try_get("empresa_nombre")?,
        })
    }
}

/// Campos escribibles de una ruta
#[derive(Debug, Clone)]
pub struct RutaData {
    pub nombre: String,
    pub origen: String,
    pub destino: String,
    pub municipio_id: String,
    pub empresa_id: String,
    pub costo_minimo: f64,
    pub costo_maximo: f64,
    pub moneda: String,
    pub duracion: Option<String>,
    pub frecuencia: Option<String>,
    pub activa: bool,
    pub notas: Option<String>,
}

impl From<&Ruta> for RutaData {
    fn from(ruta: &Ruta) -> Self {
        Self {
            nombre: ruta.nombre.clone(),
            origen: ruta.origen.clone(),
            destino: ruta.destino.clone(),
            municipio_id: ruta.municipio_id.clone(),
            empresa_id: ruta.empresa_id.clone(),
            costo_minimo: ruta.costo_minimo,
            costo_maximo: ruta.costo_maximo,
            moneda: ruta.moneda.clone(),
            duracion: ruta.duracion.clone(),
            frecuencia: ruta.frecuencia.clone(),
            activa: ruta.activa,
            notas: ruta.notas.clone(),
        }
    }
}
