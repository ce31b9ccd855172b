//! Controlador del perfil del usuario autenticado

use tracing::{info, warn};
use validator::Validate;

use crate::database::DatabaseConnection;
use crate::dto::profile_dto::{
    ProfileResponse, SaveRouteRequest, SaveRouteResponse, UpdatePreferencesRequest,
    UpdateProfileRequest, UpdateSavedRouteRequest,
};
use crate::dto::ApiResponse;
use crate::models::preferences::Preferencias;
use crate::models::saved_route::{RutaGuardada, RutaGuardadaDetalle};
use crate::models::stats::Estadisticas;
use crate::models::user::{CambiosUsuario, Usuario};
use crate::repositories::preferences_repository::PreferencesRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::saved_route_repository::SavedRouteRepository;
use crate::repositories::search_repository::SearchRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::normalize_optional;

pub struct ProfileController {
    users: UserRepository,
    preferences: PreferencesRepository,
    saved_routes: SavedRouteRepository,
    searches: SearchRepository,
    routes: RouteRepository,
}

impl ProfileController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            preferences: PreferencesRepository::new(db.clone()),
            saved_routes: SavedRouteRepository::new(db.clone()),
            searches: SearchRepository::new(db.clone()),
            routes: RouteRepository::new(db),
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ApiResponse<ProfileResponse>, AppError> {
        let usuario = self.find_user(user_id).await?;
        let preferencias = self.load_preferences(user_id).await?;
        let estadisticas = self.compute_stats(user_id).await;

        Ok(ApiResponse::success(ProfileResponse {
            usuario,
            preferencias,
            estadisticas,
        }))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<ApiResponse<Usuario>, AppError> {
        request.validate()?;

        let mut cambios = CambiosUsuario::from(request);
        if cambios.is_empty() {
            return Err(bad_request_error("No se proporcionaron datos para actualizar"));
        }

        if let Some(email) = cambios.email.take() {
            let email = email.trim().to_lowercase();
            if self.users.email_taken_by_other(&email, user_id).await? {
                return Err(AppError::Conflict(
                    "El email ya está en uso por otro usuario".to_string(),
                ));
            }
            cambios.email = Some(email);
        }

        let usuario = self
            .users
            .update_profile(user_id, &cambios)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        info!("👤 Perfil actualizado: {}", usuario.id);
        Ok(ApiResponse::success_with_message(
            usuario,
            "Perfil actualizado exitosamente",
        ))
    }

    pub async fn deactivate_account(&self, user_id: &str) -> Result<ApiResponse<()>, AppError> {
        if !self.users.set_active(user_id, false).await? {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        info!("👋 Cuenta desactivada por su titular: {}", user_id);
        Ok(ApiResponse::message("Cuenta desactivada exitosamente"))
    }

    pub async fn get_preferences(&self, user_id: &str) -> Result<ApiResponse<Preferencias>, AppError> {
        Ok(ApiResponse::success(self.load_preferences(user_id).await?))
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        request: UpdatePreferencesRequest,
    ) -> Result<ApiResponse<Preferencias>, AppError> {
        request.validate()?;

        let preferencias = self.load_preferences(user_id).await?.merge(request.into());
        self.preferences.upsert(user_id, &preferencias).await?;

        Ok(ApiResponse::success_with_message(
            preferencias,
            "Preferencias actualizadas exitosamente",
        ))
    }

    pub async fn get_stats(&self, user_id: &str) -> Result<ApiResponse<Estadisticas>, AppError> {
        Ok(ApiResponse::success(self.compute_stats(user_id).await))
    }

    pub async fn list_saved_routes(
        &self,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<RutaGuardadaDetalle>>, AppError> {
        Ok(ApiResponse::success(self.saved_routes.find_by_user(user_id).await?))
    }

    /// Guardar una ruta ya guardada la elimina
    pub async fn toggle_saved_route(
        &self,
        user_id: &str,
        request: SaveRouteRequest,
    ) -> Result<ApiResponse<SaveRouteResponse>, AppError> {
        request.validate()?;

        let ruta_id = request.ruta_id.trim();
        if self.routes.find_active_by_id(ruta_id).await?.is_none() {
            return Err(not_found_error("Ruta"));
        }

        if let Some(existente) = self.saved_routes.find_by_user_and_route(user_id, ruta_id).await? {
            self.saved_routes.delete(&existente.id, user_id).await?;
            info!("⭐ Ruta {} quitada de guardadas de {}", ruta_id, user_id);

            return Ok(ApiResponse::success_with_message(
                SaveRouteResponse {
                    guardada: false,
                    ruta_guardada: None,
                },
                "Ruta eliminada de guardadas",
            ));
        }

        let guardada = self
            .saved_routes
            .create(
                user_id,
                ruta_id,
                normalize_optional(request.nombre_personalizado),
                request.favorita.unwrap_or(false),
            )
            .await?;
        info!("⭐ Ruta {} guardada por {}", ruta_id, user_id);

        Ok(ApiResponse::success_with_message(
            SaveRouteResponse {
                guardada: true,
                ruta_guardada: Some(guardada),
            },
            "Ruta guardada exitosamente",
        ))
    }

    pub async fn update_saved_route(
        &self,
        user_id: &str,
        id: &str,
        request: UpdateSavedRouteRequest,
    ) -> Result<ApiResponse<RutaGuardada>, AppError> {
        request.validate()?;

        let guardada = self
            .saved_routes
            .update(id, user_id, request.nombre_personalizado, request.favorita)
            .await?
            .ok_or_else(|| not_found_error("Ruta guardada"))?;

        Ok(ApiResponse::success(guardada))
    }

    pub async fn delete_saved_route(&self, user_id: &str, id: &str) -> Result<ApiResponse<()>, AppError> {
        if !self.saved_routes.delete(id, user_id).await? {
            return Err(not_found_error("Ruta guardada"));
        }
        Ok(ApiResponse::message("Ruta eliminada de guardadas"))
    }

    async fn find_user(&self, user_id: &str) -> Result<Usuario, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    async fn load_preferences(&self, user_id: &str) -> Result<Preferencias, AppError> {
        Ok(self
            .preferences
            .find_by_user(user_id)
            .await?
            .unwrap_or_default())
    }

    /// Cada conteo que falla se reporta como 0
    async fn compute_stats(&self, user_id: &str) -> Estadisticas {
        let (guardadas, favoritas, busquedas) = futures::join!(
            self.saved_routes.count_by_user(user_id),
            self.saved_routes.count_favorites_by_user(user_id),
            self.searches.count_by_user(user_id),
        );

        Estadisticas::from_counts(
            count_or_zero("rutas guardadas", guardadas),
            count_or_zero("rutas favoritas", favoritas),
            count_or_zero("búsquedas", busquedas),
        )
    }
}

fn count_or_zero(label: &str, result: Result<i64, AppError>) -> i64 {
    result.unwrap_or_else(|e| {
        warn!("⚠️ No se pudo contar {}: {}", label, e);
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_or_zero() {
        assert_eq!(count_or_zero("x", Ok(7)), 7);
        assert_eq!(
            count_or_zero("x", Err(AppError::Internal("sin conexión".into()))),
            0
        );
    }
}
