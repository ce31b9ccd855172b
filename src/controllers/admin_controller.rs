//! Controlador de administración
//!
//! Gestión de rutas (con paradas y horarios), empresas y cuentas de usuario.
//! Todas las operaciones requieren un usuario con `tipo_usuario = admin`;
//! esa verificación la hace el middleware `require_admin`.

use tracing::info;
use validator::Validate;

use crate::database::DatabaseConnection;
use crate::dto::admin_dto::{
    AdminRouteDetailResponse, CreateCompanyRequest, CreateRouteRequest, UpdateCompanyRequest,
    UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::models::company::{Empresa, EmpresaData};
use crate::models::route::{RutaConNombres, RutaData};
use crate::models::schedule::NuevoHorario;
use crate::models::stop::{zip_paradas, NuevaParada};
use crate::models::user::Usuario;
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::municipality_repository::MunicipalityRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::stop_repository::StopRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{bad_request_error, not_found_error, validation_error, AppError};
use crate::utils::validation::{normalize_optional, validate_non_negative};

const DEFAULT_MONEDA: &str = "MXN";

pub struct AdminController {
    routes: RouteRepository,
    stops: StopRepository,
    schedules: ScheduleRepository,
    companies: CompanyRepository,
    municipalities: MunicipalityRepository,
    users: UserRepository,
}

impl AdminController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            routes: RouteRepository::new(db.clone()),
            stops: StopRepository::new(db.clone()),
            schedules: ScheduleRepository::new(db.clone()),
            companies: CompanyRepository::new(db.clone()),
            municipalities: MunicipalityRepository::new(db.clone()),
            users: UserRepository::new(db),
        }
    }

    // ---------------------------------------------------------------- rutas

    pub async fn list_routes(&self) -> Result<ApiResponse<Vec<RutaConNombres>>, AppError> {
        Ok(ApiResponse::success(self.routes.find_all_with_names().await?))
    }

    pub async fn get_route(&self, id: &str) -> Result<ApiResponse<AdminRouteDetailResponse>, AppError> {
        Ok(ApiResponse::success(self.route_detail(id).await?))
    }

    pub async fn create_route(
        &self,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<AdminRouteDetailResponse>, AppError> {
        request.validate()?;

        let (data, paradas, horarios) = new_route_parts(request)?;
        self.ensure_references(&data).await?;

        let id = self
            .routes
            .create_with_details(&data, &paradas, &horarios)
            .await?;

        Ok(ApiResponse::success_with_message(
            self.route_detail(&id).await?,
            "Ruta creada exitosamente",
        ))
    }

    pub async fn update_route(
        &self,
        id: &str,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<AdminRouteDetailResponse>, AppError> {
        request.validate()?;

        let actual = self
            .routes
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Ruta"))?;

        let mut data = RutaData::from(&actual);
        let changes_references = request.municipio_id.is_some() || request.empresa_id.is_some();
        let (paradas, horarios) = apply_route_changes(&mut data, request)?;

        if changes_references {
            self.ensure_references(&data).await?;
        }

        let updated = self
            .routes
            .update_with_details(id, &data, paradas.as_deref(), horarios.as_deref())
            .await?;
        if !updated {
            return Err(not_found_error("Ruta"));
        }

        info!("✏️ Ruta {} actualizada", id);
        Ok(ApiResponse::success_with_message(
            self.route_detail(id).await?,
            "Ruta actualizada exitosamente",
        ))
    }

    pub async fn delete_route(&self, id: &str) -> Result<ApiResponse<()>, AppError> {
        if !self.routes.soft_delete(id).await? {
            return Err(not_found_error("Ruta"));
        }

        info!("🗑️ Ruta {} desactivada", id);
        Ok(ApiResponse::message("Ruta eliminada exitosamente"))
    }

    async fn route_detail(&self, id: &str) -> Result<AdminRouteDetailResponse, AppError> {
        let ruta = self
            .routes
            .find_with_names(id)
            .await?
            .ok_or_else(|| not_found_error("Ruta"))?;

        let (paradas, horarios) = futures::try_join!(
            self.stops.find_all_by_route(id),
            self.schedules.find_all_by_route(id),
        )?;

        Ok(AdminRouteDetailResponse {
            ruta,
            paradas,
            horarios,
        })
    }

    async fn ensure_references(&self, data: &RutaData) -> Result<(), AppError> {
        self.ensure_municipality(&data.municipio_id).await?;
        if !self.companies.exists(&data.empresa_id).await? {
            return Err(bad_request_error("La empresa indicada no existe"));
        }
        Ok(())
    }

    async fn ensure_municipality(&self, municipio_id: &str) -> Result<(), AppError> {
        if !self.municipalities.exists(municipio_id).await? {
            return Err(bad_request_error("El municipio indicado no existe"));
        }
        Ok(())
    }

    // ------------------------------------------------------------- empresas

    pub async fn list_companies(&self) -> Result<ApiResponse<Vec<Empresa>>, AppError> {
        Ok(ApiResponse::success(self.companies.find_all().await?))
    }

    pub async fn create_company(
        &self,
        request: CreateCompanyRequest,
    ) -> Result<ApiResponse<Empresa>, AppError> {
        request.validate()?;

        let data = EmpresaData {
            nombre: request.nombre.trim().to_string(),
            municipio_id: request.municipio_id.trim().to_string(),
            telefono: normalize_optional(request.telefono),
            email: normalize_optional(request.email).map(|e| e.to_lowercase()),
            activa: request.activa.unwrap_or(true),
        };
        self.ensure_municipality(&data.municipio_id).await?;

        let empresa = self.companies.create(&data).await?;
        info!("🏢 Empresa creada: {} ({})", empresa.nombre, empresa.id);

        Ok(ApiResponse::success_with_message(
            empresa,
            "Empresa creada exitosamente",
        ))
    }

    pub async fn update_company(
        &self,
        id: &str,
        request: UpdateCompanyRequest,
    ) -> Result<ApiResponse<Empresa>, AppError> {
        request.validate()?;

        let actual = self
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Empresa"))?;

        let data = merge_company(actual, request);
        self.ensure_municipality(&data.municipio_id).await?;

        let empresa = self
            .companies
            .update(id, &data)
            .await?
            .ok_or_else(|| not_found_error("Empresa"))?;

        Ok(ApiResponse::success_with_message(
            empresa,
            "Empresa actualizada exitosamente",
        ))
    }

    pub async fn delete_company(&self, id: &str) -> Result<ApiResponse<()>, AppError> {
        if !self.companies.soft_delete(id).await? {
            return Err(not_found_error("Empresa"));
        }

        info!("🗑️ Empresa {} desactivada", id);
        Ok(ApiResponse::message("Empresa eliminada exitosamente"))
    }

    // ------------------------------------------------------------- usuarios

    pub async fn list_users(&self) -> Result<ApiResponse<Vec<Usuario>>, AppError> {
        Ok(ApiResponse::success(self.users.find_all().await?))
    }

    pub async fn set_user_status(
        &self,
        admin_id: &str,
        user_id: &str,
        activo: bool,
    ) -> Result<ApiResponse<Usuario>, AppError> {
        if admin_id == user_id && !activo {
            return Err(bad_request_error("No puedes desactivar tu propia cuenta"));
        }

        if !self.users.set_active(user_id, activo).await? {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        let usuario = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        info!(
            "👤 Usuario {} {} por {}",
            user_id,
            if activo { "activado" } else { "desactivado" },
            admin_id
        );

        let message = if activo {
            "Usuario activado exitosamente"
        } else {
            "Usuario desactivado exitosamente"
        };
        Ok(ApiResponse::success_with_message(usuario, message))
    }
}

fn ensure_fare_order(costo_minimo: f64, costo_maximo: f64) -> Result<(), AppError> {
    for (field, costo) in [("costoMinimo", costo_minimo), ("costoMaximo", costo_maximo)] {
        if validate_non_negative(costo).is_err() {
            return Err(validation_error(field, "El costo no puede ser negativo"));
        }
    }
    if costo_minimo > costo_maximo {
        return Err(validation_error(
            "costoMaximo",
            "El costo máximo debe ser mayor o igual al costo mínimo",
        ));
    }
    Ok(())
}

fn stops_from(nombres: &[String], coordenadas: &[[f64; 2]]) -> Result<Vec<NuevaParada>, AppError> {
    if nombres.len() != coordenadas.len() {
        return Err(validation_error(
            "coordenadas",
            "Debe haber una coordenada por cada parada",
        ));
    }
    if nombres.iter().any(|n| n.trim().is_empty()) {
        return Err(validation_error("paradas", "Las paradas no pueden estar vacías"));
    }
    Ok(zip_paradas(nombres, coordenadas))
}

fn normalize_moneda(moneda: Option<String>) -> String {
    normalize_optional(moneda)
        .map(|m| m.to_uppercase())
        .unwrap_or_else(|| DEFAULT_MONEDA.to_string())
}

/// Separa una solicitud de alta en datos de ruta, paradas y horarios
fn new_route_parts(
    request: CreateRouteRequest,
) -> Result<(RutaData, Vec<NuevaParada>, Vec<NuevoHorario>), AppError> {
    ensure_fare_order(request.costo_minimo, request.costo_maximo)?;
    let paradas = stops_from(&request.paradas, &request.coordenadas)?;
    let horarios = request.horarios.into_iter().map(NuevoHorario::from).collect();

    let data = RutaData {
        nombre: request.nombre.trim().to_string(),
        origen: request.origen.trim().to_string(),
        destino: request.destino.trim().to_string(),
        municipio_id: request.municipio_id.trim().to_string(),
        empresa_id: request.empresa_id.trim().to_string(),
        costo_minimo: request.costo_minimo,
        costo_maximo: request.costo_maximo,
        moneda: normalize_moneda(request.moneda),
        duracion: normalize_optional(request.duracion),
        frecuencia: normalize_optional(request.frecuencia),
        activa: request.activa.unwrap_or(true),
        notas: normalize_optional(request.notas),
    };

    Ok((data, paradas, horarios))
}

type RouteSets = (Option<Vec<NuevaParada>>, Option<Vec<NuevoHorario>>);

/// Aplica una actualización parcial. Devuelve los conjuntos de paradas y
/// horarios que deben reemplazar a los existentes, si vienen en la solicitud.
fn apply_route_changes(data: &mut RutaData, request: UpdateRouteRequest) -> Result<RouteSets, AppError> {
    if let Some(nombre) = request.nombre {
        data.nombre = nombre.trim().to_string();
    }
    if let Some(origen) = request.origen {
        data.origen = origen.trim().to_string();
    }
    if let Some(destino) = request.destino {
        data.destino = destino.trim().to_string();
    }
    if let Some(municipio_id) = request.municipio_id {
        data.municipio_id = municipio_id.trim().to_string();
    }
    if let Some(empresa_id) = request.empresa_id {
        data.empresa_id = empresa_id.trim().to_string();
    }
    if let Some(costo) = request.costo_minimo {
        data.costo_minimo = costo;
    }
    if let Some(costo) = request.costo_maximo {
        data.costo_maximo = costo;
    }
    if request.moneda.is_some() {
        data.moneda = normalize_moneda(request.moneda);
    }
    if request.duracion.is_some() {
        data.duracion = normalize_optional(request.duracion);
    }
    if request.frecuencia.is_some() {
        data.frecuencia = normalize_optional(request.frecuencia);
    }
    if request.notas.is_some() {
        data.notas = normalize_optional(request.notas);
    }
    if let Some(activa) = request.activa {
        data.activa = activa;
    }

    ensure_fare_order(data.costo_minimo, data.costo_maximo)?;

    let paradas = match (request.paradas, request.coordenadas) {
        (None, None) => None,
        (Some(nombres), Some(coordenadas)) => Some(stops_from(&nombres, &coordenadas)?),
        _ => {
            return Err(validation_error(
                "coordenadas",
                "Paradas y coordenadas deben enviarse juntas",
            ))
        }
    };
    let horarios = request
        .horarios
        .map(|hs| hs.into_iter().map(NuevoHorario::from).collect());

    Ok((paradas, horarios))
}

fn merge_company(actual: Empresa, request: UpdateCompanyRequest) -> EmpresaData {
    EmpresaData {
        nombre: request
            .nombre
            .map(|n| n.trim().to_string())
            .unwrap_or(actual.nombre),
        municipio_id: request
            .municipio_id
            .map(|m| m.trim().to_string())
            .unwrap_or(actual.municipio_id),
        telefono: match request.telefono {
            Some(telefono) => normalize_optional(Some(telefono)),
            None => actual.telefono,
        },
        email: match request.email {
            Some(email) => normalize_optional(Some(email)).map(|e| e.to_lowercase()),
            None => actual.email,
        },
        activa: request.activa.unwrap_or(actual.activa),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::admin_dto::HorarioRequest;

    fn create_request() -> CreateRouteRequest {
        serde_json::from_value(serde_json::json!({
            "nombre": " Ruta 10 ",
            "origen": "Centro",
            "destino": "Tlaquepaque",
            "municipioId": "gdl",
            "empresaId": "emp-1",
            "costoMinimo": 9.5,
            "costoMaximo": 11.0,
            "moneda": "mxn",
            "paradas": ["Centro", "Tlaquepaque"],
            "coordenadas": [[-103.35, 20.67], [-103.31, 20.64]],
            "horarios": [{ "dia": "lunes", "salidas": ["06:00"] }]
        }))
        .unwrap()
    }

    fn base_data() -> RutaData {
        let (data, _, _) = new_route_parts(create_request()).unwrap();
        data
    }

    #[test]
    fn test_new_route_parts() {
        let (data, paradas, horarios) = new_route_parts(create_request()).unwrap();

        assert_eq!(data.nombre, "Ruta 10");
        assert_eq!(data.moneda, "MXN");
        assert!(data.activa);
        assert_eq!(paradas.len(), 2);
        assert_eq!(paradas[1].orden, 2);
        assert_eq!(horarios[0].dia, "lunes");
    }

    #[test]
    fn test_new_route_defaults_currency() {
        let mut request = create_request();
        request.moneda = None;
        let (data, _, _) = new_route_parts(request).unwrap();
        assert_eq!(data.moneda, DEFAULT_MONEDA);
    }

    #[test]
    fn test_new_route_rejects_mismatched_stops() {
        let mut request = create_request();
        request.coordenadas.pop();
        assert!(matches!(new_route_parts(request), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_new_route_rejects_inverted_fares() {
        let mut request = create_request();
        request.costo_minimo = 20.0;
        match new_route_parts(request) {
            Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "costoMaximo"),
            other => panic!("se esperaba error de validación, obtenido {:?}", other.err()),
        }
    }

    #[test]
    fn test_apply_route_changes_keeps_unset_fields() {
        let mut data = base_data();
        let request = UpdateRouteRequest {
            nombre: Some("Ruta 10 Exprés".into()),
            costo_maximo: Some(14.0),
            ..Default::default()
        };

        let (paradas, horarios) = apply_route_changes(&mut data, request).unwrap();

        assert_eq!(data.nombre, "Ruta 10 Exprés");
        assert_eq!(data.origen, "Centro");
        assert_eq!(data.costo_maximo, 14.0);
        assert!(paradas.is_none());
        assert!(horarios.is_none());
    }

    #[test]
    fn test_apply_route_changes_replaces_sets() {
        let mut data = base_data();
        let request = UpdateRouteRequest {
            paradas: Some(vec!["Zapopan".into()]),
            coordenadas: Some(vec![[-103.39, 20.72]]),
            horarios: Some(vec![HorarioRequest {
                dia: "sábado".into(),
                salidas: vec!["07:00".into()],
            }]),
            ..Default::default()
        };

        let (paradas, horarios) = apply_route_changes(&mut data, request).unwrap();
        assert_eq!(paradas.unwrap()[0].nombre, "Zapopan");
        assert_eq!(horarios.unwrap()[0].dia, "sábado");
    }

    #[test]
    fn test_apply_route_changes_requires_coordinates_with_stops() {
        let mut data = base_data();
        let request = UpdateRouteRequest {
            paradas: Some(vec!["Zapopan".into()]),
            ..Default::default()
        };
        assert!(apply_route_changes(&mut data, request).is_err());
    }

    #[test]
    fn test_apply_route_changes_checks_merged_fares() {
        let mut data = base_data();
        let request = UpdateRouteRequest {
            costo_minimo: Some(12.0),
            ..Default::default()
        };
        assert!(apply_route_changes(&mut data, request).is_err());
    }

    #[test]
    fn test_merge_company_clears_empty_contact() {
        let actual = Empresa {
            id: "emp-1".into(),
            nombre: "Transportes Unidos".into(),
            municipio_id: "gdl".into(),
            telefono: Some("3312345678".into()),
            email: Some("contacto@tu.mx".into()),
            activa: true,
            fecha_creacion: None,
            fecha_actualizacion: None,
        };
        let request: UpdateCompanyRequest = serde_json::from_value(serde_json::json!({
            "telefono": "",
            "email": "Nuevo@TU.mx"
        }))
        .unwrap();

        let data = merge_company(actual, request);
        assert_eq!(data.nombre, "Transportes Unidos");
        assert_eq!(data.telefono, None);
        assert_eq!(data.email.as_deref(), Some("nuevo@tu.mx"));
        assert!(data.activa);
    }
}
