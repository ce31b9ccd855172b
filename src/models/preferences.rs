//! Modelo de Preferencias de usuario

use serde::Serialize;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

use crate::database::dialect::{as_bool, DatabaseKind};

/// Preferencias de interfaz de un usuario
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferencias {
    pub notificaciones: bool,
    pub tema: String,
    pub idioma: String,
    pub mostrar_favoritas: bool,
}

/// Valores usados cuando el usuario no tiene fila de preferencias
impl Default for Preferencias {
    fn default() -> Self {
        Self {
            notificaciones: true,
            tema: "auto".to_string(),
            idioma: "es".to_string(),
            mostrar_favoritas: true,
        }
    }
}

/// Cambios parciales de preferencias
#[derive(Debug, Clone, Default)]
pub struct CambiosPreferencias {
    pub notificaciones: Option<bool>,
    pub tema: Option<String>,
    pub idioma: Option<String>,
    pub mostrar_favoritas: Option<bool>,
}

impl Preferencias {
    pub fn columns(kind: DatabaseKind) -> String {
        format!(
            "{} AS notificaciones, tema, idioma, {} AS mostrar_favoritas",
            kind.flag("COALESCE(notificaciones, TRUE)"),
            kind.flag("COALESCE(mostrar_favoritas, TRUE)")
        )
    }

    /// Aplica los cambios sobre las preferencias actuales
    pub fn merge(mut self, cambios: CambiosPreferencias) -> Self {
        if let Some(notificaciones) = cambios.notificaciones {
            self.notificaciones = notificaciones;
        }
        if let Some(tema) = cambios.tema {
            self.tema = tema;
        }
        if let Some(idioma) = cambios.idioma {
            self.idioma = idioma;
        }
        if let Some(mostrar) = cambios.mostrar_favoritas {
            self.mostrar_favoritas = mostrar;
        }
        self
    }
}

impl<'r> FromRow<'r, AnyRow> for Preferencias {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let defaults = Preferencias::default();
        let tema: Option<String> = row.try_get("tema")?;
        let idioma: Option<String> = row.try_get("idioma")?;

        Ok(Self {
            notificaciones: as_bool(row.try_get("notificaciones")?),
            tema: tema.unwrap_or(defaults.tema),
            idioma: idioma.unwrap_or(defaults.idioma),
            mostrar_favoritas: as_bool(row.try_get("mostrar_favoritas")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_overrides_present_fields() {
        let merged = Preferencias::default().merge(CambiosPreferencias {
            tema: Some("oscuro".into()),
            mostrar_favoritas: Some(false),
            ..Default::default()
        });

        assert_eq!(merged.tema, "oscuro");
        assert!(!merged.mostrar_favoritas);
        assert!(merged.notificaciones);
        assert_eq!(merged.idioma, "es");
    }
}
