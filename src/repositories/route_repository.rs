use sqlx::AnyConnection;
use tracing::info;

use crate::database::DatabaseConnection;
use crate::models::route::{Ruta, RutaConNombres, RutaData};
use crate::models::schedule::NuevoHorario;
use crate::models::stop::NuevaParada;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::stop_repository::StopRepository;
use crate::utils::errors::AppError;
use crate::utils::ids::{generate_id, ROUTE_PREFIX};

pub struct RouteRepository {
    db: DatabaseConnection,
    stops: StopRepository,
    schedules: ScheduleRepository,
}

impl RouteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            stops: StopRepository::new(db.clone()),
            schedules: ScheduleRepository::new(db.clone()),
            db,
        }
    }

    /// Rutas activas de un municipio, más recientes primero
    pub async fn find_active_by_municipality(
        &self,
        municipio_id: &str,
    ) -> Result<Vec<Ruta>, AppError> {
        let query = format!(
            "SELECT {} FROM rutas r WHERE r.municipio_id = ? AND r.activa = TRUE \
             ORDER BY r.fecha_creacion DESC",
            Ruta::columns(self.db.kind(), "r")
        );

        let rutas = sqlx::query_as::<_, Ruta>(&self.db.sql(&query))
            .bind(municipio_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rutas)
    }

    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<Ruta>, AppError> {
        let query = format!(
            "SELECT {} FROM rutas r WHERE r.id = ? AND r.activa = TRUE",
            Ruta::columns(self.db.kind(), "r")
        );

        let ruta = sqlx::query_as::<_, Ruta>(&self.db.sql(&query))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(ruta)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Ruta>, AppError> {
        let query = format!(
            "SELECT {} FROM rutas r WHERE r.id = ?",
            Ruta::columns(self.db.kind(), "r")
        );

        let ruta = sqlx::query_as::<_, Ruta>(&self.db.sql(&query))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(ruta)
    }

    fn with_names_query(&self, filter: &str) -> String {
        format!(
            "SELECT {}, m.nombre AS municipio_nombre, e.nombre AS empresa_nombre \
             FROM rutas r \
             LEFT JOIN municipios m ON r.municipio_id = m.id \
             LEFT JOIN empresas e ON r.empresa_id = e.id \
             {} ORDER BY r.fecha_creacion DESC",
            Ruta::columns(self.db.kind(), "r"),
            filter
        )
    }

    /// Todas las rutas (incluidas inactivas) con nombres de municipio y empresa
    pub async fn find_all_with_names(&self) -> Result<Vec<RutaConNombres>, AppError> {
        let query = self.with_names_query("");

        let rutas = sqlx::query_as::<_, RutaConNombres>(&self.db.sql(&query))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rutas)
    }

    pub async fn find_with_names(&self, id: &str) -> Result<Option<RutaConNombres>, AppError> {
        let query = self.with_names_query("WHERE r.id = ?");

        let ruta = sqlx::query_as::<_, RutaConNombres>(&self.db.sql(&query))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(ruta)
    }

    /// Crea la ruta con sus paradas y horarios en una sola transacción
    pub async fn create_with_details(
        &self,
        data: &RutaData,
        paradas: &[NuevaParada],
        horarios: &[NuevoHorario],
    ) -> Result<String, AppError> {
        let id = generate_id(ROUTE_PREFIX);
        let query = format!(
            "INSERT INTO rutas (id, nombre, origen, destino, municipio_id, empresa_id, costo_minimo, \
             costo_maximo, moneda, duracion, frecuencia, usuarios_registrados, activa, notas, fecha_creacion) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, {})",
            self.db.kind().now()
        );

        let mut tx = self.db.begin().await?;

        sqlx::query(&self.db.sql(&query))
            .bind(&id)
            .bind(&data.nombre)
            .bind(&data.origen)
            .bind(&data.destino)
            .bind(&data.municipio_id)
            .bind(&data.empresa_id)
            .bind(data.costo_minimo)
            .bind(data.costo_maximo)
            .bind(&data.moneda)
            .bind(data.duracion.clone())
            .bind(data.frecuencia.clone())
            .bind(data.activa)
            .bind(data.notas.clone())
            .execute(&mut *tx)
            .await?;

        self.stops.insert_all(&mut tx, &id, paradas).await?;
        self.schedules.insert_all(&mut tx, &id, horarios).await?;

        tx.commit().await?;

        info!(
            "✅ Ruta {} creada con {} paradas y {} horarios",
            id,
            paradas.len(),
            horarios.len()
        );
        Ok(id)
    }

    /// Actualiza la ruta y, si se indican, reemplaza paradas u horarios.
    /// Devuelve `false` si la ruta no existe.
    pub async fn update_with_details(
        &self,
        id: &str,
        data: &RutaData,
        paradas: Option<&[NuevaParada]>,
        horarios: Option<&[NuevoHorario]>,
    ) -> Result<bool, AppError> {
        let mut tx = self.db.begin().await?;

        if !self.update_row(&mut tx, id, data).await? {
            return Ok(false);
        }

        if let Some(paradas) = paradas {
            self.stops.delete_by_route(&mut tx, id).await?;
            self.stops.insert_all(&mut tx, id, paradas).await?;
        }
        if let Some(horarios) = horarios {
            self.schedules.delete_by_route(&mut tx, id).await?;
            self.schedules.insert_all(&mut tx, id, horarios).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn update_row(
        &self,
        conn: &mut AnyConnection,
        id: &str,
        data: &RutaData,
    ) -> Result<bool, AppError> {
        let query = format!(
            "UPDATE rutas SET nombre = ?, origen = ?, destino = ?, municipio_id = ?, empresa_id = ?, \
             costo_minimo = ?, costo_maximo = ?, moneda = ?, duracion = ?, frecuencia = ?, activa = ?, \
             notas = ?, fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        let result = sqlx::query(&self.db.sql(&query))
            .bind(&data.nombre)
            .bind(&data.origen)
            .bind(&data.destino)
            .bind(&data.municipio_id)
            .bind(&data.empresa_id)
            .bind(data.costo_minimo)
            .bind(data.costo_maximo)
            .bind(&data.moneda)
            .bind(data.duracion.clone())
            .bind(data.frecuencia.clone())
            .bind(data.activa)
            .bind(data.notas.clone())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<bool, AppError> {
        let query = format!(
            "UPDATE rutas SET activa = FALSE, fecha_actualizacion = {} WHERE id = ?",
            self.db.kind().now()
        );

        let result = sqlx::query(&self.db.sql(&query))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
