//! Estadísticas de uso de un usuario

use serde::Serialize;

/// Minutos que se estima ahorra cada ruta guardada
pub const MINUTOS_POR_RUTA_GUARDADA: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estadisticas {
    pub rutas_guardadas: i64,
    pub rutas_favoritas: i64,
    pub busquedas_realizadas: i64,
    pub tiempo_ahorrado: i64,
}

impl Estadisticas {
    pub fn from_counts(rutas_guardadas: i64, rutas_favoritas: i64, busquedas_realizadas: i64) -> Self {
        Self {
            rutas_guardadas,
            rutas_favoritas,
            busquedas_realizadas,
            tiempo_ahorrado: rutas_guardadas * MINUTOS_POR_RUTA_GUARDADA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiempo_ahorrado() {
        let stats = Estadisticas::from_counts(4, 1, 10);
        assert_eq!(stats.tiempo_ahorrado, 20);
        assert_eq!(
            serde_json::to_value(stats).unwrap()["busquedasRealizadas"],
            10
        );
    }
}
