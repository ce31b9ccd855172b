use sqlx::Row;

use crate::database::{DatabaseConnection, DatabaseKind};
use crate::models::search_log::NuevaBusqueda;
use crate::utils::errors::AppError;

pub struct SearchRepository {
    db: DatabaseConnection,
}

impl SearchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registra una búsqueda y devuelve su id serial
    pub async fn create(&self, busqueda: &NuevaBusqueda) -> Result<i64, AppError> {
        let kind = self.db.kind();
        let mut query = format!(
            "INSERT INTO busquedas (usuario_id, query, municipio_id, resultados_encontrados, fecha_busqueda) \
             VALUES (?, ?, ?, ?, {})",
            kind.now()
        );

        match kind {
            DatabaseKind::PostgreSql => {
                query.push_str(" RETURNING CAST(id AS BIGINT) AS id");
                let row = sqlx::query(&self.db.sql(&query))
                    .bind(busqueda.usuario_id.clone())
                    .bind(&busqueda.query)
                    .bind(busqueda.municipio_id.clone())
                    .bind(busqueda.resultados_encontrados)
                    .fetch_one(self.db.pool())
                    .await?;

                Ok(row.try_get("id")?)
            }
            DatabaseKind::MySql => {
                let result = sqlx::query(&self.db.sql(&query))
                    .bind(busqueda.usuario_id.clone())
                    .bind(&busqueda.query)
                    .bind(busqueda.municipio_id.clone())
                    .bind(busqueda.resultados_encontrados)
                    .execute(self.db.pool())
                    .await?;

                result.last_insert_id().ok_or_else(|| {
                    AppError::Internal("MySQL no devolvió el id de la búsqueda".to_string())
                })
            }
        }
    }

    pub async fn count_by_user(&self, usuario_id: &str) -> Result<i64, AppError> {
        let query = format!(
            "SELECT {} AS total FROM busquedas WHERE usuario_id = ?",
            self.db.kind().int("COUNT(*)")
        );

        let row = sqlx::query(&self.db.sql(&query))
            .bind(usuario_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.try_get("total")?)
    }
}
