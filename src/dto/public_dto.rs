//! DTOs de la API pública

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::municipality::Municipio;
use crate::models::route::Ruta;
use crate::models::schedule::Horario;
use crate::models::stop::Parada;
use crate::utils::validation::validate_not_blank;

/// Query `?municipio=<id>`
#[derive(Debug, Deserialize)]
pub struct MunicipioQuery {
    pub municipio: Option<String>,
}

impl MunicipioQuery {
    /// Id del municipio si viene y no está vacío
    pub fn municipio_id(&self) -> Option<&str> {
        self.municipio
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordenada {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Serialize)]
pub struct MunicipioResponse {
    pub id: String,
    pub nombre: String,
    pub centro: Coordenada,
}

impl From<Municipio> for MunicipioResponse {
    fn from(m: Municipio) -> Self {
        Self {
            id: m.id,
            nombre: m.nombre,
            centro: Coordenada {
                lng: m.centro_lng,
                lat: m.centro_lat,
            },
        }
    }
}

/// Ruta en listados públicos
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RutaResumenResponse {
    pub id: String,
    pub nombre: String,
    pub origen: String,
    pub destino: String,
    pub empresa_id: String,
    pub costo_minimo: f64,
    pub costo_maximo: f64,
    pub moneda: String,
}

impl From<Ruta> for RutaResumenResponse {
    fn from(r: Ruta) -> Self {
        Self {
            id: r.id,
            nombre: r.nombre,
            origen: r.origen,
            destino: r.destino,
            empresa_id: r.empresa_id,
            costo_minimo: r.costo_minimo,
            costo_maximo: r.costo_maximo,
            moneda: r.moneda,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HorarioResponse {
    pub dia: String,
    pub salidas: Vec<String>,
}

/// Detalle público de una ruta
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RutaDetalleResponse {
    pub id: String,
    pub nombre: String,
    pub origen: String,
    pub destino: String,
    pub costo_minimo: f64,
    pub costo_maximo: f64,
    pub moneda: String,
    pub duracion: String,
    pub frecuencia: String,
    pub paradas: Vec<String>,
    pub coordenadas: Vec<[f64; 2]>,
    pub horarios: Vec<HorarioResponse>,
    pub notas: String,
}

impl RutaDetalleResponse {
    pub fn build(ruta: Ruta, paradas: Vec<Parada>, horarios: Vec<Horario>) -> Self {
        let coordenadas = paradas.iter().map(Parada::coordenada).collect();
        let paradas = paradas.into_iter().map(|p| p.nombre).collect();
        let horarios = horarios
            .into_iter()
            .map(|h| HorarioResponse {
                dia: h.dia,
                salidas: h.salidas,
            })
            .collect();

        Self {
            id: ruta.id,
            nombre: ruta.nombre,
            origen: ruta.origen,
            destino: ruta.destino,
            costo_minimo: ruta.costo_minimo,
            costo_maximo: ruta.costo_maximo,
            moneda: ruta.moneda,
            duracion: ruta.duracion.unwrap_or_default(),
            frecuencia: ruta.frecuencia.unwrap_or_default(),
            paradas,
            coordenadas,
            horarios,
            notas: ruta.notas.unwrap_or_default(),
        }
    }
}

/// Registro de una búsqueda
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusquedaRequest {
    #[validate(
        length(min = 1, max = 255, message = "La búsqueda debe tener entre 1 y 255 caracteres"),
        custom = "validate_not_blank"
    )]
    pub query: String,

    pub municipio_id: Option<String>,

    #[validate(range(min = 0, message = "Los resultados no pueden ser negativos"))]
    pub resultados_encontrados: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BusquedaCreadaResponse {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruta() -> Ruta {
        Ruta {
            id: "rt-1-abc".into(),
            nombre: "Ruta 1".into(),
            origen: "Centro".into(),
            destino: "Terminal".into(),
            municipio_id: "gdl".into(),
            empresa_id: "emp-1".into(),
            costo_minimo: 10.0,
            costo_maximo: 12.5,
            moneda: "MXN".into(),
            duracion: Some("45 min".into()),
            frecuencia: None,
            usuarios_registrados: 0,
            activa: true,
            notas: None,
            fecha_creacion: None,
            fecha_actualizacion: None,
        }
    }

    fn parada(nombre: &str, orden: i64, lng: f64, lat: f64) -> Parada {
        Parada {
            id: orden,
            ruta_id: "rt-1-abc".into(),
            nombre: nombre.into(),
            orden,
            coordenada_lng: lng,
            coordenada_lat: lat,
            activa: true,
        }
    }

    #[test]
    fn test_route_detail_shape() {
        let detalle = RutaDetalleResponse::build(
            ruta(),
            vec![parada("Centro", 1, -103.35, 20.67), parada("Terminal", 2, -103.4, 20.7)],
            vec![Horario {
                id: 1,
                ruta_id: "rt-1-abc".into(),
                dia: "lunes".into(),
                salidas: vec!["06:00".into()],
                activo: true,
            }],
        );

        let json = serde_json::to_value(&detalle).unwrap();
        assert_eq!(json["paradas"], serde_json::json!(["Centro", "Terminal"]));
        assert_eq!(json["coordenadas"][1], serde_json::json!([-103.4, 20.7]));
        assert_eq!(json["horarios"][0]["salidas"][0], "06:00");
        assert_eq!(json["costoMaximo"], 12.5);
        assert_eq!(json["notas"], "");
        assert_eq!(json["frecuencia"], "");
        assert_eq!(json["duracion"], "45 min");
    }

    #[test]
    fn test_municipio_query() {
        let query = MunicipioQuery {
            municipio: Some("  ".into()),
        };
        assert_eq!(query.municipio_id(), None);

        let query = MunicipioQuery {
            municipio: Some("gdl".into()),
        };
        assert_eq!(query.municipio_id(), Some("gdl"));
    }
}
