//! Middleware del sistema
//!
//! Este módulo contiene el middleware para autenticación, CORS, rate limiting
//! y cabeceras de seguridad.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use auth::{authenticate, optional_auth, require_admin, AuthenticatedUser};
pub use cors::cors_middleware_with_origins;
pub use rate_limit::{rate_limit_middleware, RateLimitState};
pub use security::with_security_headers;
