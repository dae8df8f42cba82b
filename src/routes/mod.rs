//! Routers HTTP
//!
//! Cada recurso expone su propio `Router`; `create_app` los anida bajo
//! `/api` y aplica las capas comunes.

pub mod delivery_route_routes;
pub mod event_routes;
pub mod order_routes;
pub mod voice_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Construir la aplicación completa con su estado
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.is_development() || state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/voice", voice_routes::create_voice_router())
        .nest("/api/orders", order_routes::create_order_router())
        .nest("/api/routes", delivery_route_routes::create_delivery_route_router())
        .nest("/api/events", event_routes::create_event_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
