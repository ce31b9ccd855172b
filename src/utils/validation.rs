//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos que usan
//! los DTOs a través de `#[validate(custom = "...")]`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    static ref PHONE: Regex = Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap();
    static ref HORA: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Temas de interfaz aceptados en las preferencias
pub const TEMAS: [&str; 3] = ["oscuro", "claro", "auto"];

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar que un string no esté vacío (tras recortar espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("not_blank", "El valor no puede estar vacío"));
    }
    Ok(())
}

/// Validar formato de teléfono (básico). Cadenas vacías se aceptan: se guardan como NULL.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if !PHONE.is_match(value.trim()) {
        let mut error = error_with_message("phone", "Teléfono inválido");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un email opcional. La cadena vacía se acepta y se guarda como NULL.
pub fn validate_email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || validator::validate_email(value.trim()) {
        return Ok(());
    }
    Err(error_with_message("email", "Email inválido"))
}

/// Validar nombre de empresa: 2 a 120 caracteres tras recortar espacios
pub fn validate_company_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if !(2..=120).contains(&len) {
        return Err(error_with_message(
            "length",
            "El nombre debe tener entre 2 y 120 caracteres",
        ));
    }
    Ok(())
}

/// Validar una lista de salidas en formato `HH:MM`
pub fn validate_salidas(values: &[String]) -> Result<(), ValidationError> {
    for value in values {
        if !HORA.is_match(value.trim()) {
            let mut error = error_with_message("hora", "Las salidas deben tener formato HH:MM");
            error.add_param("value".into(), value);
            return Err(error);
        }
    }
    Ok(())
}

/// Validar tema de preferencias
pub fn validate_tema(value: &str) -> Result<(), ValidationError> {
    if !TEMAS.contains(&value) {
        let mut error = error_with_message("tema", "El tema debe ser oscuro, claro o auto");
        error.add_param("allowed_values".into(), &TEMAS);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.message = Some("Latitud fuera de rango (-90 a 90)".into());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.message = Some("Longitud fuera de rango (-180 a 180)".into());
        return Err(error);
    }

    Ok(())
}

/// Validar una lista de pares `[lng, lat]`
pub fn validate_coordinate_list(values: &[[f64; 2]]) -> Result<(), ValidationError> {
    for [lng, lat] in values {
        validate_coordinates(*lat, *lng)?;
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T>(value: T) -> Result<(), ValidationError>
where
    T: PartialOrd + num_traits::Zero + Serialize,
{
    if value < T::zero() {
        let mut error = error_with_message("non_negative", "El valor no puede ser negativo");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Normaliza campos opcionales de texto: recorta y convierte "" en `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+52 (33) 1234-5678").is_ok());
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("abc").is_err());
    }

    #[test]
    fn test_validate_email_or_empty() {
        assert!(validate_email_or_empty("").is_ok());
        assert!(validate_email_or_empty("contacto@transportes.mx").is_ok());
        assert!(validate_email_or_empty("contacto").is_err());
    }

    #[test]
    fn test_validate_company_name() {
        assert!(validate_company_name("  Transportes del Sur ").is_ok());
        assert!(validate_company_name(" a ").is_err());
        assert!(validate_company_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_salidas() {
        assert!(validate_salidas(&["06:00".into(), "23:59".into()]).is_ok());
        assert!(validate_salidas(&["24:00".into()]).is_err());
        assert!(validate_salidas(&["6:00".into()]).is_err());
    }

    #[test]
    fn test_validate_tema() {
        assert!(validate_tema("oscuro").is_ok());
        assert!(validate_tema("auto").is_ok());
        assert!(validate_tema("rosa").is_err());
    }

    #[test]
    fn test_validate_coordinate_list() {
        assert!(validate_coordinate_list(&[[-103.35, 20.67], [-99.13, 19.43]]).is_ok());
        assert!(validate_coordinate_list(&[[20.67, -103.35]]).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0.0_f64).is_ok());
        assert!(validate_non_negative(12.5_f64).is_ok());
        assert!(validate_non_negative(-1_i64).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" 555 ".into())), Some("555".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
