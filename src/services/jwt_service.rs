use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::environment::JwtSettings;
use crate::models::user::{TipoUsuario, Usuario};
use crate::utils::errors::AppError;

const RESET_PURPOSE: &str = "password_reset";

/// Claims de los tokens de acceso y refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub tipo_usuario: TipoUsuario,
    pub iat: i64,
    pub exp: i64,
}

/// Claims del token de recuperación de contraseña
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetClaims {
    pub user_id: String,
    pub email: String,
    pub purpose: String,
    pub iat: i64,
    pub exp: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Servicio JWT: emite y verifica tokens de acceso, refresh y recuperación
pub struct JwtService {
    access: KeyPair,
    refresh: KeyPair,
    reset: KeyPair,
    access_ttl: i64,
    refresh_ttl: i64,
    reset_ttl: i64,
    expires_in: String,
}

impl JwtService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            access: KeyPair::from_secret(&settings.secret),
            refresh: KeyPair::from_secret(&settings.refresh_secret),
            reset: KeyPair::from_secret(&settings.reset_secret),
            access_ttl: settings.expires.as_secs() as i64,
            refresh_ttl: settings.refresh_expires.as_secs() as i64,
            reset_ttl: settings.reset_expires.as_secs() as i64,
            expires_in: settings.expires_in.clone(),
        }
    }

    /// Duración configurada del token de acceso (`7d`, `12h`, ...)
    pub fn expires_in(&self) -> &str {
        &self.expires_in
    }

    fn claims_for(usuario: &Usuario, ttl: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            user_id: usuario.id.clone(),
            email: usuario.email.clone(),
            tipo_usuario: usuario.tipo_usuario,
            iat: now,
            exp: now + ttl,
        }
    }

    /// Genera un token de acceso
    pub fn generate_access_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        sign(&Self::claims_for(usuario, self.access_ttl), &self.access)
    }

    /// Genera un token de refresh
    pub fn generate_refresh_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        sign(&Self::claims_for(usuario, self.refresh_ttl), &self.refresh)
    }

    /// Genera un token de recuperación de contraseña
    pub fn generate_reset_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = ResetClaims {
            user_id: usuario.id.clone(),
            email: usuario.email.clone(),
            purpose: RESET_PURPOSE.to_string(),
            iat: now,
            exp: now + self.reset_ttl,
        };
        sign(&claims, &self.reset)
    }

    /// Valida y decodifica un token de acceso
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.access)
    }

    /// Valida y decodifica un token de refresh
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.refresh).map_err(|_| {
            AppError::Jwt("Refresh token inválido o expirado".to_string())
        })
    }

    /// Valida un token de recuperación de contraseña
    pub fn verify_reset_token(&self, token: &str) -> Result<ResetClaims, AppError> {
        let claims: ResetClaims = verify(token, &self.reset)
            .map_err(|_| AppError::BadRequest("Token inválido o expirado".to_string()))?;

        if claims.purpose != RESET_PURPOSE {
            return Err(AppError::BadRequest("Token inválido o expirado".to_string()));
        }
        Ok(claims)
    }
}

fn sign<T: Serialize>(claims: &T, keys: &KeyPair) -> Result<String, AppError> {
    encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

fn verify<T: DeserializeOwned>(token: &str, keys: &KeyPair) -> Result<T, AppError> {
    decode::<T>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Jwt("Token expirado".to_string()),
            _ => AppError::Jwt("Token inválido".to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "access-secret".into(),
            expires_in: "7d".into(),
            expires: Duration::from_secs(7 * 86_400),
            refresh_secret: "refresh-secret".into(),
            refresh_expires_in: "30d".into(),
            refresh_expires: Duration::from_secs(30 * 86_400),
            reset_secret: "reset-secret".into(),
            reset_expires: Duration::from_secs(3_600),
        }
    }

    fn usuario() -> Usuario {
        Usuario {
            id: "usr-1700000000000-abcdefghi".into(),
            nombre: "Luis".into(),
            apellido: None,
            email: "luis@mobzi.mx".into(),
            password_hash: String::new(),
            reset_token: None,
            telefono: None,
            tipo_usuario: TipoUsuario::Admin,
            municipio_preferido: None,
            activo: true,
            fecha_registro: None,
            fecha_actualizacion: None,
            ultimo_acceso: None,
        }
    }

    #[test]
    fn test_access_token_claims() {
        let service = JwtService::new(&settings());
        let token = service.generate_access_token(&usuario()).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.user_id, "usr-1700000000000-abcdefghi");
        assert_eq!(claims.tipo_usuario, TipoUsuario::Admin);
        assert_eq!(claims.exp - claims.iat, 7 * 86_400);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let service = JwtService::new(&settings());
        let access = service.generate_access_token(&usuario()).unwrap();
        let refresh = service.generate_refresh_token(&usuario()).unwrap();

        assert!(service.verify_refresh_token(&access).is_err());
        assert!(service.verify_access_token(&refresh).is_err());
        assert!(service.verify_reset_token(&access).is_err());
    }

    #[test]
    fn test_reset_token() {
        let service = JwtService::new(&settings());
        let token = service.generate_reset_token(&usuario()).unwrap();
        let claims = service.verify_reset_token(&token).unwrap();
        assert_eq!(claims.email, "luis@mobzi.mx");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(&settings());
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: "usr-1".into(),
            email: "x@y.mx".into(),
            tipo_usuario: TipoUsuario::Regular,
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let token = sign(&claims, &service.access).unwrap();

        match service.verify_access_token(&token) {
            Err(AppError::Jwt(msg)) => assert_eq!(msg, "Token expirado"),
            other => panic!("se esperaba token expirado: {:?}", other),
        }
    }

    #[test]
    fn test_claims_are_camel_case() {
        let service = JwtService::new(&settings());
        let claims = JwtService::claims_for(&usuario(), service.access_ttl);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("userId").is_some());
        assert_eq!(json["tipoUsuario"], "admin");
    }
}
