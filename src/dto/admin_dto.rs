//! DTOs del panel de administración

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::route::RutaConNombres;
use crate::models::schedule::{Horario, NuevoHorario};
use crate::models::stop::Parada;
use crate::utils::validation::{
    validate_company_name, validate_coordinate_list, validate_email_or_empty, validate_not_blank,
    validate_phone, validate_salidas,
};

/// Horario enviado por el panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorarioRequest {
    pub dia: String,
    #[serde(default)]
    pub salidas: Vec<String>,
}

impl From<HorarioRequest> for NuevoHorario {
    fn from(h: HorarioRequest) -> Self {
        Self {
            dia: h.dia.trim().to_string(),
            salidas: h.salidas.into_iter().map(|s| s.trim().to_string()).collect(),
        }
    }
}

/// Cada horario necesita día y salidas `HH:MM`
pub fn validate_horarios(horarios: &[HorarioRequest]) -> Result<(), ValidationError> {
    for horario in horarios {
        let dia = horario.dia.trim().chars().count();
        if dia == 0 || dia > 20 {
            let mut error = ValidationError::new("dia");
            error.message = Some("Cada horario requiere un día (máximo 20 caracteres)".into());
            return Err(error);
        }
        validate_salidas(&horario.salidas)?;
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[validate(
        length(min = 2, max = 150, message = "El nombre debe tener entre 2 y 150 caracteres"),
        custom = "validate_not_blank"
    )]
    pub nombre: String,

    #[validate(
        length(min = 2, max = 150, message = "El origen debe tener entre 2 y 150 caracteres"),
        custom = "validate_not_blank"
    )]
    pub origen: String,

    #[validate(
        length(min = 2, max = 150, message = "El destino debe tener entre 2 y 150 caracteres"),
        custom = "validate_not_blank"
    )]
    pub destino: String,

    #[validate(length(min = 1, message = "El municipio es requerido"))]
    pub municipio_id: String,

    #[validate(length(min = 1, message = "La empresa es requerida"))]
    pub empresa_id: String,

    #[validate(range(min = 0.0, message = "El costo no puede ser negativo"))]
    pub costo_minimo: f64,

    #[validate(range(min = 0.0, message = "El costo no puede ser negativo"))]
    pub costo_maximo: f64,

    #[validate(length(equal = 3, message = "La moneda debe ser un código de 3 letras"))]
    pub moneda: Option<String>,

    #[validate(length(max = 50))]
    pub duracion: Option<String>,

    #[validate(length(max = 50))]
    pub frecuencia: Option<String>,

    #[validate(length(max = 500))]
    pub notas: Option<String>,

    pub activa: Option<bool>,

    #[serde(default)]
    pub paradas: Vec<String>,

    #[serde(default)]
    #[validate(custom = "validate_coordinate_list")]
    pub coordenadas: Vec<[f64; 2]>,

    #[serde(default)]
    #[validate(custom = "validate_horarios")]
    pub horarios: Vec<HorarioRequest>,
}

/// Actualización parcial de ruta. Paradas/coordenadas y horarios, si vienen,
/// reemplazan los conjuntos existentes.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 150))]
    pub nombre: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub origen: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub destino: Option<String>,

    #[validate(length(min = 1))]
    pub municipio_id: Option<String>,

    #[validate(length(min = 1))]
    pub empresa_id: Option<String>,

    #[validate(range(min = 0.0, message = "El costo no puede ser negativo"))]
    pub costo_minimo: Option<f64>,

    #[validate(range(min = 0.0, message = "El costo no puede ser negativo"))]
    pub costo_maximo: Option<f64>,

    #[validate(length(equal = 3, message = "La moneda debe ser un código de 3 letras"))]
    pub moneda: Option<String>,

    #[validate(length(max = 50))]
    pub duracion: Option<String>,

    #[validate(length(max = 50))]
    pub frecuencia: Option<String>,

    #[validate(length(max = 500))]
    pub notas: Option<String>,

    pub activa: Option<bool>,

    pub paradas: Option<Vec<String>>,

    #[validate(custom = "validate_coordinate_list")]
    pub coordenadas: Option<Vec<[f64; 2]>>,

    #[validate(custom = "validate_horarios")]
    pub horarios: Option<Vec<HorarioRequest>>,
}

/// Ruta con todas sus paradas y horarios, incluidos inactivos
#[derive(Debug, Serialize)]
pub struct AdminRouteDetailResponse {
    #[serde(flatten)]
    pub ruta: RutaConNombres,
    pub paradas: Vec<Parada>,
    pub horarios: Vec<Horario>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[validate(custom = "validate_company_name")]
    pub nombre: String,

    #[validate(length(min = 1, message = "El municipio es requerido"))]
    pub municipio_id: String,

    #[validate(length(max = 20), custom = "validate_phone")]
    pub telefono: Option<String>,

    #[validate(length(max = 255), custom = "validate_email_or_empty")]
    pub email: Option<String>,

    pub activa: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[validate(custom = "validate_company_name")]
    pub nombre: Option<String>,

    #[validate(length(min = 1, message = "El municipio es requerido"))]
    pub municipio_id: Option<String>,

    #[validate(length(max = 20), custom = "validate_phone")]
    pub telefono: Option<String>,

    #[validate(length(max = 255), custom = "validate_email_or_empty")]
    pub email: Option<String>,

    pub activa: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub activo: bool,
}
