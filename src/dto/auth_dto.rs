use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::Usuario;

/// Request de registro
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "El nombre debe tener entre 2 y 50 caracteres"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "El apellido debe tener entre 2 y 50 caracteres"))]
    pub last_name: String,

    #[validate(email(message = "Email inválido"), length(max = 255))]
    pub email: String,

    #[validate(length(min = 8, max = 100, message = "La contraseña debe tener entre 8 y 100 caracteres"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Las contraseñas no coinciden"))]
    pub confirm_password: String,

    #[serde(default)]
    pub accept_terms: bool,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub password: String,

    #[serde(default)]
    pub remember_user: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "El refresh token es requerido"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "El token es requerido"))]
    pub token: String,

    #[validate(length(min = 8, max = 100, message = "La contraseña debe tener entre 8 y 100 caracteres"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Las contraseñas no coinciden"))]
    pub confirm_password: String,
}

/// Respuesta de login y registro
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub usuario: Usuario,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: String,
}

/// Solo incluye el token en modo desarrollo
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}
