//! Middleware de Rate Limiting
//!
//! Este módulo maneja la limitación de requests por IP con ventana fija
//! para prevenir abuso de la API. Las respuestas llevan las cabeceras
//! `RateLimit-Limit`, `RateLimit-Remaining` y `RateLimit-Reset`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::utils::errors::AppError;

/// Información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Resultado de contar una request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Estado de un limitador
#[derive(Clone, Debug)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Cuenta una request de `ip` y decide si se permite
    pub async fn check(&self, ip: &str) -> RateLimitDecision {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        let reset_after = self
            .window_duration
            .saturating_sub(now.duration_since(info.window_start));

        if info.requests >= self.max_requests {
            return RateLimitDecision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_after,
            };
        }

        info.requests += 1;
        RateLimitDecision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - info.requests,
            reset_after,
        }
    }
}

/// IP del cliente: último valor de `x-forwarded-for` o la dirección del socket.
/// Se confía en un solo proxy; los valores anteriores los escribe el cliente.
pub fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.rsplit(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_header(headers: &mut HeaderMap, name: &'static str, value: u64) {
    headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
}

fn rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let reset = decision.reset_after.as_secs().max(1);
    set_header(headers, "ratelimit-limit", u64::from(decision.limit));
    set_header(headers, "ratelimit-remaining", u64::from(decision.remaining));
    set_header(headers, "ratelimit-reset", reset);
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let decision = limiter.check(&ip).await;

    if !decision.allowed {
        warn!("🚫 Rate limit excedido para {} en {}", ip, request.uri().path());
        let mut response = AppError::RateLimitExceeded.into_response();
        let headers = response.headers_mut();
        rate_limit_headers(headers, &decision);
        set_header(headers, "retry-after", decision.reset_after.as_secs().max(1));
        return response;
    }

    let mut response = next.run(request).await;
    rate_limit_headers(response.headers_mut(), &decision);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));

        let first = limiter.check("10.0.0.1").await;
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        assert!(limiter.check("10.0.0.1").await.allowed);

        let third = limiter.check("10.0.0.1").await;
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);

        assert!(limiter.check("10.0.0.2").await.allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimitState::new(1, Duration::from_millis(20));
        assert!(limiter.check("10.0.0.1").await.allowed);
        assert!(!limiter.check("10.0.0.1").await.allowed);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check("10.0.0.1").await.allowed);
    }

    #[test]
    fn test_client_ip_from_forwarded_header() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 198.51.100.4")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "198.51.100.4");

        let request = Request::builder()
            .header("x-forwarded-for", "198.51.100.4")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "198.51.100.4");

        let request = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_ip(&request), "unknown");
    }
}
