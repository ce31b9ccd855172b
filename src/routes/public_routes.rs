use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::info;

use crate::controllers::public_controller::PublicController;
use crate::dto::public_dto::{
    BusquedaCreadaResponse, CreateBusquedaRequest, MunicipioQuery, MunicipioResponse,
    RutaDetalleResponse, RutaResumenResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{optional_auth, AuthenticatedUser};
use crate::models::company::EmpresaResumen;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::extract::{Json, Query};

pub fn create_public_router(state: AppState) -> Router<AppState> {
    let busquedas = Router::new()
        .route("/busquedas", post(registrar_busqueda))
        .route_layer(from_fn_with_state(state, optional_auth));

    Router::new()
        .route("/municipios", get(list_municipios))
        .route("/rutas", get(list_rutas))
        .route("/rutas/:id", get(get_ruta))
        .route("/empresas", get(list_empresas))
        .route("/debug/logs", post(client_logs))
        .merge(busquedas)
}

fn require_municipio(query: &MunicipioQuery) -> Result<&str, AppError> {
    query
        .municipio_id()
        .ok_or_else(|| bad_request_error("Parámetro municipio requerido"))
}

async fn list_municipios(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MunicipioResponse>>>, AppError> {
    let controller = PublicController::new(state.db.clone());
    Ok(Json(controller.list_municipios().await?))
}

async fn list_rutas(
    State(state): State<AppState>,
    Query(query): Query<MunicipioQuery>,
) -> Result<Json<ApiResponse<Vec<RutaResumenResponse>>>, AppError> {
    let municipio_id = require_municipio(&query)?;
    let controller = PublicController::new(state.db.clone());
    Ok(Json(controller.list_rutas(municipio_id).await?))
}

async fn list_empresas(
    State(state): State<AppState>,
    Query(query): Query<MunicipioQuery>,
) -> Result<Json<ApiResponse<Vec<EmpresaResumen>>>, AppError> {
    let municipio_id = require_municipio(&query)?;
    let controller = PublicController::new(state.db.clone());
    Ok(Json(controller.list_empresas(municipio_id).await?))
}

async fn get_ruta(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RutaDetalleResponse>>, AppError> {
    let controller = PublicController::new(state.db.clone());
    Ok(Json(controller.get_ruta(&id).await?))
}

async fn registrar_busqueda(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Json(request): Json<CreateBusquedaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BusquedaCreadaResponse>>), AppError> {
    let controller = PublicController::new(state.db.clone());
    let response = controller
        .registrar_busqueda(user.map(|u| u.id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Logs que envía el cliente para depuración
async fn client_logs(Json(payload): Json<Value>) -> Json<Value> {
    info!(target: "client_log", "📱 {}", payload);
    Json(json!({ "success": true }))
}
