use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, put},
    Router,
};

use crate::controllers::admin_controller::AdminController;
use crate::dto::admin_dto::{
    AdminRouteDetailResponse, CreateCompanyRequest, CreateRouteRequest, UpdateCompanyRequest,
    UpdateRouteRequest, UpdateUserStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{authenticate, require_admin, AuthenticatedUser};
use crate::models::company::Empresa;
use crate::models::route::RutaConNombres;
use crate::models::user::Usuario;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::Json;

/// Rutas de administración. `authenticate` corre antes que `require_admin`.
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/rutas", get(list_routes).post(create_route))
        .route(
            "/rutas/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route("/empresas", get(list_companies).post(create_company))
        .route("/empresas/:id", put(update_company).delete(delete_company))
        .route("/usuarios", get(list_users))
        .route("/usuarios/:id", patch(set_user_status))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, authenticate))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RutaConNombres>>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.list_routes().await?))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AdminRouteDetailResponse>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.get_route(&id).await?))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminRouteDetailResponse>>), AppError> {
    let controller = AdminController::new(state.db.clone());
    let response = controller.create_route(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<AdminRouteDetailResponse>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.update_route(&id, request).await?))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.delete_route(&id).await?))
}

async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Empresa>>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.list_companies().await?))
}

async fn create_company(
    State(state): State<AppState>,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Empresa>>), AppError> {
    let controller = AdminController::new(state.db.clone());
    let response = controller.create_company(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCompanyRequest>,
) -> Result<Json<ApiResponse<Empresa>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.update_company(&id, request).await?))
}

async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.delete_company(&id).await?))
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Usuario>>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(controller.list_users().await?))
}

async fn set_user_status(
    State(state): State<AppState>,
    admin: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserStatusRequest>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let controller = AdminController::new(state.db.clone());
    Ok(Json(
        controller
            .set_user_status(&admin.id, &id, request.activo)
            .await?,
    ))
}
