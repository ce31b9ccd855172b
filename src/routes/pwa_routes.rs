use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

use crate::state::AppState;

const SERVICE_WORKER: &str = "service-worker.js";

/// Archivos estáticos de la PWA bajo `/pwa`
pub fn create_pwa_router(dir: &str) -> Router<AppState> {
    let service = ServiceBuilder::new()
        .layer(from_fn(pwa_headers))
        .service(ServeDir::new(dir));

    Router::new().nest_service("/pwa", service)
}

async fn pwa_headers(request: Request, next: Next) -> Response {
    let is_service_worker = request.uri().path().ends_with(SERVICE_WORKER);
    let mut response = next.run(request).await;

    if response.status().is_success() {
        let headers = response.headers_mut();
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        );
        if is_service_worker {
            headers.insert(
                HeaderName::from_static("service-worker-allowed"),
                HeaderValue::from_static("/"),
            );
        }
    }

    response
}
