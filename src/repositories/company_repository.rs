use crate::database::DatabaseConnection;
use crate::models::company::{Empresa, EmpresaData, EmpresaResumen};
use crate::utils::errors::AppError;
use crate::utils::ids::{generate_id, COMPANY_PREFIX};

pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Empresas activas de un municipio, por nombre
    pub async fn find_active_by_municipality(
        &self,
        municipio_id: &str,
    ) -> Result<Vec<EmpresaResumen>, AppError> {
        let empresas = sqlx::query_as::<_, EmpresaResumen>(&self.db.sql(
            "SELECT id, nombre FROM empresas WHERE municipio_id = ? AND activa = TRUE ORDER BY nombre ASC",
        ))
        .bind(municipio_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(empresas)
    }

    pub async fn find_all(&self) -> Result<Vec<Empresa>, AppError> {
        let query = format!(
            "SELECT {} FROM empresas ORDER BY fecha_creacion DESC",
            Empresa::columns(self.db.kind())
        );

        let empresas = sqlx::query_as::<_, Empresa>(&self.db.sql(&query))
            .fetch_all(self.db.pool())
            .await?;

        Ok(empresas)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Empresa>, AppError> {
        let query = format!(
            "SELECT {} FROM empresas WHERE id = ?",
            Empresa::columns(self.db.kind())
        );

        let empresa = sqlx::query_as::<_, Empresa>(&self.db.sql(&query))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(empresa)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let row = sqlx::query(&self.db.sql("SELECT id FROM empresas WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    pub async fn create(&self, data: &EmpresaData) -> Result<Empresa, AppError> {
        let id = generate_id(COMPANY_PREFIX);
        let query = format!(
            "INSERT INTO empresas (id, nombre, municipio_id, telefono, email, activa, fecha_creacion) \
             VALUES (?, ?, ?, ?, ?, ?, {})",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(&id)
            .bind(&data.nombre)
            .bind(&data.municipio_id)
            .bind(data.telefono.clone())
            .bind(data.email.clone())
            .bind(data.activa)
            .execute(self.db.pool())
            .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Empresa {} no encontrada tras crearla", id)))
    }

    /// Reemplaza los campos editables. `None` si la empresa no existe.
    pub async fn update(&self, id: &str, data: &EmpresaData) -> Result<Option<Empresa>, AppError> {
        let query = format!(
            "UPDATE empresas SET nombre = ?, municipio_id = ?, telefono = ?, email = ?, activa = ?, \
             fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        let result = sqlx::query(&self.db.sql(&query))
            .bind(&data.nombre)
            .bind(&data.municipio_id)
            .bind(data.telefono.clone())
            .bind(data.email.clone())
            .bind(data.activa)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn soft_delete(&self, id: &str) -> Result<bool, AppError> {
        let query = format!(
            "UPDATE empresas SET activa = FALSE, fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        let result = sqlx::query(&self.db.sql(&query))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
