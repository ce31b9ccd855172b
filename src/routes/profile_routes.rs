use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};

use crate::controllers::profile_controller::ProfileController;
use crate::dto::profile_dto::{
    ProfileResponse, SaveRouteRequest, SaveRouteResponse, UpdatePreferencesRequest,
    UpdateProfileRequest, UpdateSavedRouteRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{authenticate, AuthenticatedUser};
use crate::models::preferences::Preferencias;
use crate::models::saved_route::{RutaGuardada, RutaGuardadaDetalle};
use crate::models::stats::Estadisticas;
use crate::models::user::Usuario;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::Json;

pub fn create_profile_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_profile).put(update_profile).delete(deactivate_account),
        )
        .route("/preferencias", get(get_preferences).put(update_preferences))
        .route("/estadisticas", get(get_stats))
        .route(
            "/rutas-guardadas",
            get(list_saved_routes).post(toggle_saved_route),
        )
        .route(
            "/rutas-guardadas/:id",
            patch(update_saved_route).delete(delete_saved_route),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}

async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.get_profile(&user.id).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.update_profile(&user.id, request).await?))
}

async fn deactivate_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.deactivate_account(&user.id).await?))
}

async fn get_preferences(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Preferencias>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.get_preferences(&user.id).await?))
}

async fn update_preferences(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<ApiResponse<Preferencias>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.update_preferences(&user.id, request).await?))
}

async fn get_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Estadisticas>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.get_stats(&user.id).await?))
}

async fn list_saved_routes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<RutaGuardadaDetalle>>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.list_saved_routes(&user.id).await?))
}

async fn toggle_saved_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SaveRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaveRouteResponse>>), AppError> {
    let controller = ProfileController::new(state.db.clone());
    let response = controller.toggle_saved_route(&user.id, request).await?;

    let status = match &response.data {
        Some(data) if data.guardada => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(response)))
}

async fn update_saved_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateSavedRouteRequest>,
) -> Result<Json<ApiResponse<RutaGuardada>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.update_saved_route(&user.id, &id, request).await?))
}

async fn delete_saved_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ProfileController::new(state.db.clone());
    Ok(Json(controller.delete_saved_route(&user.id, &id).await?))
}
