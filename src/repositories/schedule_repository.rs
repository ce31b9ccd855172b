use sqlx::AnyConnection;

use crate::database::DatabaseConnection;
use crate::models::schedule::{Horario, NuevoHorario};
use crate::utils::errors::AppError;

pub struct ScheduleRepository {
    db: DatabaseConnection,
}

impl ScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Horarios activos de una ruta ordenados por día
    pub async fn find_active_by_route(&self, ruta_id: &str) -> Result<Vec<Horario>, AppError> {
        let query = format!(
            "SELECT {} FROM horarios WHERE ruta_id = ? AND activo = TRUE ORDER BY dia ASC",
            Horario::columns(self.db.kind())
        );

        let horarios = sqlx::query_as::<_, Horario>(&self.db.sql(&query))
            .bind(ruta_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(horarios)
    }

    pub async fn find_all_by_route(&self, ruta_id: &str) -> Result<Vec<Horario>, AppError> {
        let query = format!(
            "SELECT {} FROM horarios WHERE ruta_id = ? ORDER BY dia ASC",
            Horario::columns(self.db.kind())
        );

        let horarios = sqlx::query_as::<_, Horario>(&self.db.sql(&query))
            .bind(ruta_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(horarios)
    }

    /// Inserta horarios dentro de la transacción del llamador
    pub async fn insert_all(
        &self,
        conn: &mut AnyConnection,
        ruta_id: &str,
        horarios: &[NuevoHorario],
    ) -> Result<(), AppError> {
        let kind = self.db.kind();
        let query = format!(
            "INSERT INTO horarios (ruta_id, dia, salidas, activo, fecha_creacion) \
             VALUES (?, ?, {}, TRUE, {})",
            kind.json_param(),
            kind.now()
        );
        let sql = self.db.sql(&query);

        for horario in horarios {
            let salidas = serde_json::to_string(&horario.salidas)
                .map_err(|e| AppError::Internal(format!("Error serializando salidas: {}", e)))?;

            sqlx::query(&sql)
                .bind(ruta_id)
                .bind(&horario.dia)
                .bind(salidas)
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
        let result = sqlx::query(&self.db.sql("DELETE FROM horarios WHERE ruta_id = ?"))
            .bind(ruta_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
