use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mobzi_api::config::{DatabaseConfig, EnvironmentConfig};
use mobzi_api::database::DatabaseConnection;
use mobzi_api::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚌 MOBZI API - Rutas de transporte público");
    info!("================================================");
    info!("🌎 Entorno: {}", config.environment);

    for warning in config.warnings() {
        warn!("⚠️ {}", warning);
    }
    if config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        warn!("⚠️ CORS abierto a cualquier origen en producción");
    }

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_env().context("Configuración de base de datos inválida")?;
    let db = match DatabaseConnection::connect(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let addr: SocketAddr = config
        .server_address()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_address()))?;
    let api_prefix = config.api_prefix();

    let state = AppState::new(db.clone(), config);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servidor y la base de datos");
    info!("   GET  {}/municipios, /rutas, /rutas/:id, /empresas", api_prefix);
    info!("   POST {}/auth/register, /login, /refresh, /forgot-password, /reset-password", api_prefix);
    info!("   *    {}/profile - Perfil, preferencias y rutas guardadas", api_prefix);
    info!("   *    {}/admin - Rutas, empresas y usuarios", api_prefix);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("No se pudo escuchar en {}", addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| {
        error!("❌ Error del servidor: {}", e);
        e
    })?;

    db.close().await;
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
