//! Routers de la API
//!
//! `create_app` arma la aplicación completa: health, raíz, API versionada
//! bajo `/api/v1`, archivos de la PWA y la capa de middleware común.

pub mod admin_routes;
pub mod auth_routes;
pub mod profile_routes;
pub mod public_routes;
pub mod pwa_routes;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::error;

use crate::middleware::{cors_middleware_with_origins, rate_limit_middleware, with_security_headers};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .merge(public_routes::create_public_router(state.clone()))
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/profile", profile_routes::create_profile_router(state.clone()))
        .nest("/admin", admin_routes::create_admin_router(state.clone()))
        .layer(from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ));

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(&config.api_prefix(), api)
        .merge(pwa_routes::create_pwa_router(&config.pwa_dir))
        .fallback(not_found)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CompressionLayer::new())
        .layer(cors_middleware_with_origins(
            &config.cors_origins,
            config.cors_credentials,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    with_security_headers(app)
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "MOBZI API - Rutas de transporte público",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "documentation": state.config.api_prefix(),
    }))
}

/// 503 si la base de datos no responde
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let environment = state.config.environment.clone();

    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "connected",
                "timestamp": timestamp,
                "environment": environment,
            })),
        ),
        Err(e) => {
            error!("❌ Health check falló: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "database": "disconnected",
                    "timestamp": timestamp,
                    "environment": environment,
                })),
            )
        }
    }
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Ruta no encontrada",
            "path": uri.path(),
        })),
    )
}
