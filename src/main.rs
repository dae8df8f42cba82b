use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use voice_delivery::config::environment::EnvironmentConfig;
use voice_delivery::routes::create_app;
use voice_delivery::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🎙️ Voice Delivery - Pedidos por voz y rutas de reparto");
    info!("=====================================================");
    info!("🌍 Entorno: {}", config.environment);

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::from_config(config)?;
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🎤 Voz:");
    info!("   POST /api/voice/transcribe - Transcribir y crear pedido");
    info!("📋 Pedidos:");
    info!("   POST /api/orders - Crear pedido");
    info!("   GET  /api/orders - Listar pedidos");
    info!("   GET  /api/orders/stats - Contadores por estado");
    info!("   GET  /api/orders/:id - Obtener pedido");
    info!("   POST /api/orders/:id/confirm - Confirmar pedido");
    info!("   DELETE /api/orders/:id - Rechazar pedido");
    info!("🗺️ Rutas:");
    info!("   POST /api/routes - Planificar ruta con pedidos confirmados");
    info!("   GET  /api/routes - Listar rutas");
    info!("   GET  /api/routes/:id - Obtener ruta");
    info!("   GET  /api/routes/:id/progress - Progreso");
    info!("   GET  /api/routes/:id/current - Parada actual");
    info!("   POST /api/routes/:id/stops/:stop_id/delivered - Marcar entregada");
    info!("   POST /api/routes/:id/resequence - Reordenar o reoptimizar paradas restantes");
    info!("   GET  /api/routes/:id/navigation - Enlaces de navegación");
    info!("📡 Eventos:");
    info!("   GET  /api/events - Stream SSE");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de señales: {}", e);
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
