use crate::database::DatabaseConnection;
use crate::models::municipality::Municipio;
use crate::utils::errors::AppError;

pub struct MunicipalityRepository {
    db: DatabaseConnection,
}

impl MunicipalityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Municipios activos ordenados por nombre
    pub async fn find_active(&self) -> Result<Vec<Municipio>, AppError> {
        let query = format!(
            "SELECT {} FROM municipios WHERE activo = TRUE ORDER BY nombre ASC",
            Municipio::columns(self.db.kind())
        );

        let municipios = sqlx::query_as::<_, Municipio>(&self.db.sql(&query))
            .fetch_all(self.db.pool())
            .await?;

        Ok(municipios)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let row = sqlx::query(&self.db.sql("SELECT id FROM municipios WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}
