//! Utilidades para manejo de contraseñas

use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::errors::{AppError, FieldError};

const SALT_ROUNDS: u32 = 10;

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Hash de contraseña con bcrypt. Se ejecuta fuera del runtime async.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash(password, SALT_ROUNDS))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hash abortada: {}", e)))?
        .map_err(AppError::from)
}

/// Verificar contraseña contra su hash
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed = hashed.to_owned();
    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de verificación abortada: {}", e)))?
        .map_err(AppError::from)
}

/// Validar fortaleza de contraseña. Devuelve la lista de reglas incumplidas.
pub fn password_strength_errors(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("La contraseña debe tener al menos 8 caracteres".to_string());
    }
    if !UPPERCASE.is_match(password) {
        errors.push("La contraseña debe contener al menos una letra mayúscula".to_string());
    }
    if !LOWERCASE.is_match(password) {
        errors.push("La contraseña debe contener al menos una letra minúscula".to_string());
    }
    if !DIGIT.is_match(password) {
        errors.push("La contraseña debe contener al menos un número".to_string());
    }

    errors
}

/// Igual que `password_strength_errors` pero como `AppError::Validation` sobre `field`
pub fn ensure_strong_password(field: &str, password: &str) -> Result<(), AppError> {
    let errors = password_strength_errors(password);
    if errors.is_empty() {
        return Ok(());
    }

    Err(AppError::Validation(
        errors
            .into_iter()
            .map(|message| FieldError::new(field, message))
            .collect(),
    ))
}
