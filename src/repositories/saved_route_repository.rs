use sqlx::Row;

use crate::database::DatabaseConnection;
use crate::models::saved_route::{RutaGuardada, RutaGuardadaDetalle};
use crate::utils::errors::AppError;
use crate::utils::ids::{generate_id, SAVED_ROUTE_PREFIX};

pub struct SavedRouteRepository {
    db: DatabaseConnection,
}

impl SavedRouteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rutas guardadas del usuario con datos de la ruta, más recientes primero
    pub async fn find_by_user(&self, usuario_id: &str) -> Result<Vec<RutaGuardadaDetalle>, AppError> {
        let query = format!(
            "SELECT {}, r.nombre AS ruta_nombre, r.origen, r.destino, \
             m.nombre AS municipio_nombre, e.nombre AS empresa_nombre \
             FROM rutas_guardadas rg \
             LEFT JOIN rutas r ON rg.ruta_id = r.id \
             LEFT JOIN municipios m ON r.municipio_id = m.id \
             LEFT JOIN empresas e ON r.empresa_id = e.id \
             WHERE rg.usuario_id = ? \
             ORDER BY rg.fecha_creacion DESC",
            RutaGuardada::columns(self.db.kind(), "rg")
        );

        let rutas = sqlx::query_as::<_, RutaGuardadaDetalle>(&self.db.sql(&query))
            .bind(usuario_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rutas)
    }

    pub async fn find_by_user_and_route(
        &self,
        usuario_id: &str,
        ruta_id: &str,
    ) -> Result<Option<RutaGuardada>, AppError> {
        let query = format!(
            "SELECT {} FROM rutas_guardadas rg WHERE rg.usuario_id = ? AND rg.ruta_id = ?",
            RutaGuardada::columns(self.db.kind(), "rg")
        );

        let guardada = sqlx::query_as::<_, RutaGuardada>(&self.db.sql(&query))
            .bind(usuario_id)
            .bind(ruta_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(guardada)
    }

    /// Ruta guardada solo si pertenece al usuario
    pub async fn find_owned(&self, id: &str, usuario_id: &str) -> Result<Option<RutaGuardada>, AppError> {
        let query = format!(
            "SELECT {} FROM rutas_guardadas rg WHERE rg.id = ? AND rg.usuario_id = ?",
            RutaGuardada::columns(self.db.kind(), "rg")
        );

        let guardada = sqlx::query_as::<_, RutaGuardada>(&self.db.sql(&query))
            .bind(id)
            .bind(usuario_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(guardada)
    }

    pub async fn create(
        &self,
        usuario_id: &str,
        ruta_id: &str,
        nombre_personalizado: Option<String>,
        favorita: bool,
    ) -> Result<RutaGuardada, AppError> {
        let id = generate_id(SAVED_ROUTE_PREFIX);
        let query = format!(
            "INSERT INTO rutas_guardadas (id, usuario_id, ruta_id, nombre_personalizado, favorita, fecha_creacion) \
             VALUES (?, ?, ?, ?, ?, {})",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(&id)
            .bind(usuario_id)
            .bind(ruta_id)
            .bind(nombre_personalizado)
            .bind(favorita)
            .execute(self.db.pool())
            .await?;

        self.find_owned(&id, usuario_id).await?.ok_or_else(|| {
            AppError::Internal(format!("Ruta guardada {} no encontrada tras crearla", id))
        })
    }

    /// Actualiza nombre y/o favorita. `None` si no existe o es de otro usuario.
    pub async fn update(
        &self,
        id: &str,
        usuario_id: &str,
        nombre_personalizado: Option<String>,
        favorita: Option<bool>,
    ) -> Result<Option<RutaGuardada>, AppError> {
        let Some(actual) = self.find_owned(id, usuario_id).await? else {
            return Ok(None);
        };

        let nombre = match nombre_personalizado {
            Some(nombre) => Some(nombre.trim().to_string()).filter(|n| !n.is_empty()),
            None => actual.nombre_personalizado,
        };
        let favorita = favorita.unwrap_or(actual.favorita);

        let query = format!(
            "UPDATE rutas_guardadas SET nombre_personalizado = ?, favorita = ?, fecha_actualizacion = {} \
             WHERE id = ? AND usuario_id = ?",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(nombre)
            .bind(favorita)
            .bind(id)
            .bind(usuario_id)
            .execute(self.db.pool())
            .await?;

        self.find_owned(id, usuario_id).await
    }

    pub async fn delete(&self, id: &str, usuario_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(&self.db.sql(
            "DELETE FROM rutas_guardadas WHERE id = ? AND usuario_id = ?",
        ))
        .bind(id)
        .bind(usuario_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_user(&self, usuario_id: &str) -> Result<i64, AppError> {
        self.count(
            "SELECT {} AS total FROM rutas_guardadas WHERE usuario_id = ?",
            usuario_id,
        )
        .await
    }

    pub async fn count_favorites_by_user(&self, usuario_id: &str) -> Result<i64, AppError> {
        self.count(
            "SELECT {} AS total FROM rutas_guardadas WHERE usuario_id = ? AND favorita = TRUE",
            usuario_id,
        )
        .await
    }

    async fn count(&self, template: &str, usuario_id: &str) -> Result<i64, AppError> {
        let query = template.replacen("{}", &self.db.kind().int("COUNT(*)"), 1);

        let row = sqlx::query(&self.db.sql(&query))
            .bind(usuario_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("total")?)
    }
}
