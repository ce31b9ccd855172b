//! Controlador de autenticación
//!
//! Registro, login, renovación de tokens y recuperación de contraseña.
//! Los emails se normalizan a minúsculas antes de cualquier consulta.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, TokenPairResponse,
};
use crate::dto::ApiResponse;
use crate::models::user::{NuevoUsuario, TipoUsuario, Usuario};
use crate::repositories::user_repository::UserRepository;
use crate::services::JwtService;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::password::{ensure_strong_password, hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";
const FORGOT_PASSWORD_MESSAGE: &str =
    "Si el email está registrado, recibirás instrucciones para restablecer tu contraseña";

pub struct AuthController {
    users: UserRepository,
    jwt: Arc<JwtService>,
    development: bool,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: UserRepository::new(state.db.clone()),
            jwt: state.jwt.clone(),
            development: state.config.is_development(),
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        if !request.accept_terms {
            return Err(validation_error(
                "acceptTerms",
                "Debes aceptar los términos y condiciones",
            ));
        }
        ensure_strong_password("password", &request.password)?;

        let email = request.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        let password_hash = hash_password(&request.password).await?;
        let usuario = self
            .users
            .create(&NuevoUsuario {
                nombre: request.first_name.trim().to_string(),
                apellido: Some(request.last_name.trim().to_string()),
                email,
                password_hash,
                telefono: None,
                tipo_usuario: TipoUsuario::Regular,
                municipio_preferido: None,
            })
            .await?;

        info!("✅ Usuario registrado: {} ({})", usuario.email, usuario.id);

        let response = self.auth_response(usuario, true)?;
        Ok(ApiResponse::success_with_message(
            response,
            "Usuario registrado exitosamente",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        let usuario = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &usuario.password_hash).await? {
            warn!("🔐 Contraseña incorrecta para {}", usuario.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !usuario.activo {
            return Err(AppError::Forbidden("Tu cuenta ha sido desactivada".to_string()));
        }

        self.users.touch_last_access(&usuario.id).await?;
        info!("🔑 Login exitoso: {}", usuario.email);

        let response = self.auth_response(usuario, request.remember_user)?;
        Ok(ApiResponse::success_with_message(response, "Login exitoso"))
    }

    pub async fn refresh(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<ApiResponse<TokenPairResponse>, AppError> {
        request.validate()?;

        let claims = self.jwt.verify_refresh_token(&request.refresh_token)?;
        let usuario = self
            .users
            .find_by_id(&claims.user_id)
            .await?
            .filter(|u| u.activo)
            .ok_or_else(|| AppError::Jwt("Refresh token inválido o expirado".to_string()))?;

        Ok(ApiResponse::success(TokenPairResponse {
            token: self.jwt.generate_access_token(&usuario)?,
            refresh_token: self.jwt.generate_refresh_token(&usuario)?,
            expires_in: self.jwt.expires_in().to_string(),
        }))
    }

    /// Responde siempre lo mismo para no revelar qué emails existen
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<ApiResponse<ForgotPasswordResponse>, AppError> {
        request.validate()?;

        let mut response = ForgotPasswordResponse::default();

        match self.users.find_by_email(&request.email).await? {
            Some(usuario) if usuario.activo => {
                let token = self.jwt.generate_reset_token(&usuario)?;
                self.users.set_reset_token(&usuario.id, Some(&token)).await?;
                info!("📧 Token de recuperación generado para {}", usuario.email);

                if self.development {
                    response.reset_token = Some(token);
                }
            }
            _ => info!("📧 Recuperación solicitada para email no registrado o inactivo"),
        }

        Ok(ApiResponse::success_with_message(
            response,
            FORGOT_PASSWORD_MESSAGE,
        ))
    }

    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        request.validate()?;
        ensure_strong_password("password", &request.password)?;

        let claims = self.jwt.verify_reset_token(&request.token)?;
        let usuario = self
            .users
            .find_by_id(&claims.user_id)
            .await?
            .filter(|u| u.reset_token.as_deref() == Some(request.token.as_str()))
            .ok_or_else(|| AppError::BadRequest("Token inválido o expirado".to_string()))?;

        let password_hash = hash_password(&request.password).await?;
        self.users.update_password(&usuario.id, &password_hash).await?;

        info!("🔐 Contraseña restablecida para {}", usuario.email);
        Ok(ApiResponse::message("Contraseña actualizada exitosamente"))
    }

    pub async fn me(&self, user_id: &str) -> Result<ApiResponse<Usuario>, AppError> {
        let usuario = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(ApiResponse::success(usuario))
    }

    fn auth_response(&self, usuario: Usuario, with_refresh: bool) -> Result<AuthResponse, AppError> {
        let token = self.jwt.generate_access_token(&usuario)?;
        let refresh_token = if with_refresh {
            Some(self.jwt.generate_refresh_token(&usuario)?)
        } else {
            None
        };

        Ok(AuthResponse {
            usuario,
            token,
            refresh_token,
            expires_in: self.jwt.expires_in().to_string(),
        })
    }
}
