use crate::database::DatabaseConnection;
use crate::models::user::{CambiosUsuario, NuevoUsuario, Usuario};
use crate::utils::errors::AppError;
use crate::utils::ids::{generate_id, USER_PREFIX};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Usuario>, AppError> {
        let query = format!(
            "SELECT {} FROM usuarios WHERE id = ?",
            Usuario::columns(self.db.kind())
        );

        let usuario = sqlx::query_as::<_, Usuario>(&self.db.sql(&query))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(usuario)
    }

    /// Busca por email (se compara en minúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let query = format!(
            "SELECT {} FROM usuarios WHERE email = ?",
            Usuario::columns(self.db.kind())
        );

        let usuario = sqlx::query_as::<_, Usuario>(&self.db.sql(&query))
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(usuario)
    }

    /// Todos los usuarios, más recientes primero
    pub async fn find_all(&self) -> Result<Vec<Usuario>, AppError> {
        let query = format!(
            "SELECT {} FROM usuarios ORDER BY fecha_registro DESC",
            Usuario::columns(self.db.kind())
        );

        let usuarios = sqlx::query_as::<_, Usuario>(&self.db.sql(&query))
            .fetch_all(self.db.pool())
            .await?;

        Ok(usuarios)
    }

    /// Verifica si el email pertenece a otro usuario
    pub async fn email_taken_by_other(&self, email: &str, user_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query(&self.db.sql("SELECT id FROM usuarios WHERE email = ? AND id <> ?"))
            .bind(email.trim().to_lowercase())
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    pub async fn create(&self, nuevo: &NuevoUsuario) -> Result<Usuario, AppError> {
        let id = generate_id(USER_PREFIX);
        let query = format!(
            "INSERT INTO usuarios (id, nombre, apellido, email, password_hash, telefono, tipo_usuario, \
             municipio_preferido, activo, fecha_registro) VALUES (?, ?, ?, ?, ?, ?, ?, ?, TRUE, {})",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(&id)
            .bind(nuevo.nombre.trim())
            .bind(nuevo.apellido.clone())
            .bind(nuevo.email.trim().to_lowercase())
            .bind(&nuevo.password_hash)
            .bind(nuevo.telefono.clone())
            .bind(nuevo.tipo_usuario.as_str())
            .bind(nuevo.municipio_preferido.clone())
            .execute(self.db.pool())
            .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Usuario {} no encontrado tras crearlo", id)))
    }

    /// Aplica cambios de perfil. Cadenas vacías en campos opcionales se guardan como NULL.
    pub async fn update_profile(
        &self,
        id: &str,
        cambios: &CambiosUsuario,
    ) -> Result<Option<Usuario>, AppError> {
        if cambios.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(nombre) = &cambios.nombre {
            sets.push("nombre = ?");
            values.push(nombre.trim().to_string());
        }
        if let Some(apellido) = &cambios.apellido {
            sets.push("apellido = NULLIF(?, '')");
            values.push(apellido.trim().to_string());
        }
        if let Some(email) = &cambios.email {
            sets.push("email = ?");
            values.push(email.trim().to_lowercase());
        }
        if let Some(telefono) = &cambios.telefono {
            sets.push("telefono = NULLIF(?, '')");
            values.push(telefono.trim().to_string());
        }
        if let Some(municipio) = &cambios.municipio_preferido {
            sets.push("municipio_preferido = NULLIF(?, '')");
            values.push(municipio.trim().to_string());
        }

        let query = format!(
            "UPDATE usuarios SET {}, fecha_actualizacion = {} WHERE id = ?",
            sets.join(", "),
            self.db.kind().now()
        );

        let sql = self.db.sql(&query);
        let mut statement = sqlx::query(&sql);
        for value in values {
            statement = statement.bind(value);
        }

        let result = statement.bind(id).execute(self.db.pool()).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn touch_last_access(&self, id: &str) -> Result<(), AppError> {
        let query = format!(
            "UPDATE usuarios SET ultimo_acceso = {} WHERE id = ?",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    pub async fn set_reset_token(&self, id: &str, token: Option<&str>) -> Result<(), AppError> {
        sqlx::query(&self.db.sql("UPDATE usuarios SET reset_token = ? WHERE id = ?"))
            .bind(token.map(str::to_string))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Guarda el nuevo hash y limpia el token de recuperación
    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        let query = format!(
            "UPDATE usuarios SET password_hash = ?, reset_token = NULL, fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        sqlx::query(&self.db.sql(&query))
            .bind(password_hash)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    pub async fn set_active(&self, id: &str, activo: bool) -> Result<bool, AppError> {
        let query = format!(
            "UPDATE usuarios SET activo = ?, fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        let result = sqlx::query(&self.db.sql(&query))
            .bind(activo)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
