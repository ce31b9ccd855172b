use sqlx::AnyConnection;

use crate::database::DatabaseConnection;
use crate::models::stop::{NuevaParada, Parada};
use crate::utils::errors::AppError;

pub struct StopRepository {
    db: DatabaseConnection,
}

impl StopRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paradas activas de una ruta en orden
    pub async fn find_active_by_route(&self, ruta_id: &str) -> Result<Vec<Parada>, AppError> {
        let query = format!(
            "SELECT {} FROM paradas WHERE ruta_id = ? AND activa = TRUE ORDER BY orden ASC",
            Parada::columns(self.db.kind())
        );

        let paradas = sqlx::query_as::<_, Parada>(&self.db.sql(&query))
            .bind(ruta_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(paradas)
    }

    /// Todas las paradas, incluidas las inactivas
    pub async fn find_all_by_route(&self, ruta_id: &str) -> Result<Vec<Parada>, AppError> {
        let query = format!(
            "SELECT {} FROM paradas WHERE ruta_id = ? ORDER BY orden ASC",
            Parada::columns(self.db.kind())
        );

        let paradas = sqlx::query_as::<_, Parada>(&self.db.sql(&query))
            .bind(ruta_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(paradas)
    }

    /// Inserta paradas dentro de la transacción del llamador
    pub async fn insert_all(
        &self,
        conn: &mut AnyConnection,
        ruta_id: &str,
        paradas: &[NuevaParada],
    ) -> Result<(), AppError> {
        let query = format!(
            "INSERT INTO paradas (ruta_id, nombre, orden, coordenada_lng, coordenada_lat, activa, fecha_creacion) \
             VALUES (?, ?, ?, ?, ?, TRUE, {})",
            self.db.kind().now()
        );
        let sql = self.db.sql(&query);

        for parada in paradas {
            sqlx::query(&sql)
                .bind(ruta_id)
                .bind(&parada.nombre)
                .bind(parada.orden)
                .bind(parada.coordenada_lng)
                .bind(parada.coordenada_lat)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    pub async fn delete_by_route(
        &self,
        conn: &mut AnyConnection,
        ruta_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(&self.db.sql("DELETE FROM paradas WHERE ruta_id = ?"))
            .bind(ruta_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
