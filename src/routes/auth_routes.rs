use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, TokenPairResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{authenticate, AuthenticatedUser};
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::models::user::Usuario;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::Json;

/// Rutas de autenticación, con el límite de requests más estricto
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .merge(protected)
        .layer(from_fn_with_state(
            state.auth_rate_limit.clone(),
            rate_limit_middleware,
        ))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.login(request).await?))
}

async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.refresh(request).await?))
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<ForgotPasswordResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.forgot_password(request).await?))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.reset_password(request).await?))
}

async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Usuario>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.me(&user.id).await?))
}
