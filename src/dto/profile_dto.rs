use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::preferences::{CambiosPreferencias, Preferencias};
use crate::models::saved_route::RutaGuardada;
use crate::models::stats::Estadisticas;
use crate::models::user::{CambiosUsuario, Usuario};
use crate::utils::validation::{validate_phone, validate_tema};

/// Cambios de perfil. Los campos ausentes no se modifican.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    pub nombre: Option<String>,

    #[validate(length(min = 2, max = 100, message = "El apellido debe tener entre 2 y 100 caracteres"))]
    pub apellido: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(length(max = 20), custom = "validate_phone")]
    pub telefono: Option<String>,

    pub municipio_preferido: Option<String>,
}

impl From<UpdateProfileRequest> for CambiosUsuario {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            nombre: r.nombre,
            apellido: r.apellido,
            email: r.email,
            telefono: r.telefono,
            municipio_preferido: r.municipio_preferido,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub usuario: Usuario,
    pub preferencias: Preferencias,
    pub estadisticas: Estadisticas,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub notificaciones: Option<bool>,

    #[validate(custom = "validate_tema")]
    pub tema: Option<String>,

    #[validate(length(min = 2, max = 10, message = "Idioma inválido"))]
    pub idioma: Option<String>,

    pub mostrar_favoritas: Option<bool>,
}

impl From<UpdatePreferencesRequest> for CambiosPreferencias {
    fn from(r: UpdatePreferencesRequest) -> Self {
        Self {
            notificaciones: r.notificaciones,
            tema: r.tema,
            idioma: r.idioma,
            mostrar_favoritas: r.mostrar_favoritas,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteRequest {
    #[validate(length(min = 1, message = "El id de la ruta es requerido"))]
    pub ruta_id: String,

    #[validate(length(max = 100, message = "El nombre no puede exceder 100 caracteres"))]
    pub nombre_personalizado: Option<String>,

    pub favorita: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSavedRouteRequest {
    #[validate(length(max = 100, message = "El nombre no puede exceder 100 caracteres"))]
    pub nombre_personalizado: Option<String>,

    pub favorita: Option<bool>,
}

/// Resultado de guardar/quitar una ruta
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteResponse {
    pub guardada: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruta_guardada: Option<RutaGuardada>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_reject_unknown_theme() {
        let request = UpdatePreferencesRequest {
            notificaciones: None,
            tema: Some("rosa".into()),
            idioma: None,
            mostrar_favoritas: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_profile_accepts_empty_phone() {
        let request: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "telefono": "", "municipioPreferido": "gdl" }))
                .unwrap();
        assert!(request.validate().is_ok());

        let cambios = CambiosUsuario::from(request);
        assert_eq!(cambios.municipio_preferido.as_deref(), Some("gdl"));
        assert!(cambios.nombre.is_none());
    }
}
