//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::models::user::{TipoUsuario, Usuario};
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::extract_token_from_header;

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub tipo_usuario: TipoUsuario,
    pub nombre: String,
    pub apellido: Option<String>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.tipo_usuario == TipoUsuario::Admin
    }
}

impl From<&Usuario> for AuthenticatedUser {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id.clone(),
            email: usuario.email.clone(),
            tipo_usuario: usuario.tipo_usuario,
            nombre: usuario.nombre.clone(),
            apellido: usuario.apellido.clone(),
        }
    }
}

/// Extrae el usuario que dejó `authenticate` en las extensions
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Autenticación requerida".to_string()))
    }
}

/// Verifica el token y carga el usuario activo
async fn resolve_user(state: &AppState, token: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = state.jwt.verify_access_token(token)?;

    let usuario = UserRepository::new(state.db.clone())
        .find_by_id(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !usuario.activo {
        return Err(AppError::Forbidden("Tu cuenta ha sido desactivada".to_string()));
    }

    Ok(AuthenticatedUser::from(&usuario))
}

fn authorization_header(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Middleware de autenticación JWT
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = authorization_header(&request)
        .ok_or_else(|| AppError::Unauthorized("Token de autenticación requerido".to_string()))?;
    let token = extract_token_from_header(header)?.to_string();

    let user = resolve_user(&state, &token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Middleware opcional: adjunta el usuario si el token es válido, nunca falla
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = authorization_header(&request)
        .and_then(|header| extract_token_from_header(header).ok())
        .map(str::to_string);

    if let Some(token) = token {
        match resolve_user(&state, &token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => debug!("Token opcional ignorado: {}", e),
        }
    }

    next.run(request).await
}

/// Middleware para verificar permisos de admin. Debe ir después de `authenticate`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("Autenticación requerida".to_string()))?;

    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Acceso denegado. Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
