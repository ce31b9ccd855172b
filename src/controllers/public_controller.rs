//! Controlador de la API pública: municipios, rutas, empresas y búsquedas

use tracing::{debug, info};

use crate::database::DatabaseConnection;
use crate::dto::public_dto::{
    BusquedaCreadaResponse, CreateBusquedaRequest, MunicipioResponse, RutaDetalleResponse,
    RutaResumenResponse,
};
use crate::dto::ApiResponse;
use crate::models::company::EmpresaResumen;
use crate::models::search_log::NuevaBusqueda;
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::municipality_repository::MunicipalityRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::search_repository::SearchRepository;
use crate::repositories::stop_repository::StopRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalize_optional;
use validator::Validate;

pub struct PublicController {
    municipalities: MunicipalityRepository,
    routes: RouteRepository,
    stops: StopRepository,
    schedules: ScheduleRepository,
    companies: CompanyRepository,
    searches: SearchRepository,
}

impl PublicController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            municipalities: MunicipalityRepository::new(db.clone()),
            routes: RouteRepository::new(db.clone()),
            stops: StopRepository::new(db.clone()),
            schedules: ScheduleRepository::new(db.clone()),
            companies: CompanyRepository::new(db.clone()),
            searches: SearchRepository::new(db),
        }
    }

    pub async fn list_municipios(&self) -> Result<ApiResponse<Vec<MunicipioResponse>>, AppError> {
        let municipios = self.municipalities.find_active().await?;
        debug!("📍 {} municipios activos", municipios.len());

        Ok(ApiResponse::success(
            municipios.into_iter().map(MunicipioResponse::from).collect(),
        ))
    }

    pub async fn list_rutas(
        &self,
        municipio_id: &str,
    ) -> Result<ApiResponse<Vec<RutaResumenResponse>>, AppError> {
        let rutas = self.routes.find_active_by_municipality(municipio_id).await?;
        debug!("🚌 {} rutas activas en {}", rutas.len(), municipio_id);

        Ok(ApiResponse::success(
            rutas.into_iter().map(RutaResumenResponse::from).collect(),
        ))
    }

    pub async fn list_empresas(
        &self,
        municipio_id: &str,
    ) -> Result<ApiResponse<Vec<EmpresaResumen>>, AppError> {
        let empresas = self.companies.find_active_by_municipality(municipio_id).await?;
        Ok(ApiResponse::success(empresas))
    }

    /// Detalle de una ruta activa. Paradas y horarios se consultan en paralelo.
    pub async fn get_ruta(&self, id: &str) -> Result<ApiResponse<RutaDetalleResponse>, AppError> {
        let ruta = self
            .routes
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Ruta"))?;

        let (paradas, horarios) = futures::try_join!(
            self.stops.find_active_by_route(&ruta.id),
            self.schedules.find_active_by_route(&ruta.id),
        )?;

        Ok(ApiResponse::success(RutaDetalleResponse::build(
            ruta, paradas, horarios,
        )))
    }

    pub async fn registrar_busqueda(
        &self,
        usuario_id: Option<String>,
        request: CreateBusquedaRequest,
    ) -> Result<ApiResponse<BusquedaCreadaResponse>, AppError> {
        request.validate()?;

        let busqueda = NuevaBusqueda {
            usuario_id,
            query: request.query.trim().to_string(),
            municipio_id: normalize_optional(request.municipio_id),
            resultados_encontrados: request.resultados_encontrados.unwrap_or(0),
        };

        let id = self.searches.create(&busqueda).await?;
        info!("🔎 Búsqueda {} registrada: {:?}", id, busqueda.query);

        Ok(ApiResponse::success(BusquedaCreadaResponse { id }))
    }
}
