use crate::database::DatabaseConnection;
use crate::models::preferences::Preferencias;
use crate::utils::errors::AppError;

pub struct PreferencesRepository {
    db: DatabaseConnection,
}

impl PreferencesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Preferencias guardadas, si el usuario tiene fila
    pub async fn find_by_user(&self, usuario_id: &str) -> Result<Option<Preferencias>, AppError> {
        let query = format!(
            "SELECT {} FROM preferencias_usuario WHERE usuario_id = ?",
            Preferencias::columns(self.db.kind())
        );

        let preferencias = sqlx::query_as::<_, Preferencias>(&self.db.sql(&query))
            .bind(usuario_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(preferencias)
    }

    /// Inserta o actualiza la fila del usuario
    pub async fn upsert(&self, usuario_id: &str, preferencias: &Preferencias) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query(&self.db.sql(
            "SELECT usuario_id FROM preferencias_usuario WHERE usuario_id = ?",
        ))
        .bind(usuario_id)
        .fetch_optional(&mut *tx)
        .await?;

        let query = if existing.is_some() {
            "UPDATE preferencias_usuario SET notificaciones = ?, tema = ?, idioma = ?, mostrar_favoritas = ? \
             WHERE usuario_id = ?"
        } else {
            "INSERT INTO preferencias_usuario (notificaciones, tema, idioma, mostrar_favoritas, usuario_id) \
             VALUES (?, ?, ?, ?, ?)"
        };

        sqlx::query(&self.db.sql(query))
            .bind(preferencias.notificaciones)
            .bind(&preferencias.tema)
            .bind(&preferencias.idioma)
            .bind(preferencias.mostrar_favoritas)
            .bind(usuario_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
