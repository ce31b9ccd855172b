//! Registro de búsquedas

/// Búsqueda a registrar en `busquedas`
#[derive(Debug, Clone)]
pub struct NuevaBusqueda {
    pub usuario_id: Option<String>,
    pub query: String,
    pub municipio_id: Option<String>,
    pub resultados_encontrados: i64,
}
