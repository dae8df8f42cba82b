//! DTOs para el servicio externo de optimización de rutas
//!
//! Formato JSON intercambiado con `HttpRouteOptimizer`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::order::{Order, Priority};

/// Request enviado al optimizador
#[derive(Debug, Serialize)]
pub struct OptimizerRequest {
    pub stops: Vec<OptimizerStop>,
}

/// Parada a ordenar
#[derive(Debug, Serialize)]
pub struct OptimizerStop {
    pub id: Uuid,
    pub address: String,
    pub priority: Priority,
    /// HH:MM
    pub scheduled_time: String,
}

impl From<&Order> for OptimizerStop {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.0,
            address: order.address.clone(),
            priority: order.priority,
            scheduled_time: order.requested_time.format("%H:%M").to_string(),
        }
    }
}

/// Response del optimizador
#[derive(Debug, Deserialize)]
pub struct OptimizerResponse {
    /// Ids en orden de visita
    pub sequence: Vec<Uuid>,
    #[serde(default)]
    pub total_distance_km: Option<f64>,
    #[serde(default)]
    pub total_duration_minutes: Option<u32>,
    #[serde(default)]
    pub time_saved_minutes: Option<u32>,
    /// Minutos estimados por parada, indexados por id de pedido
    #[serde(default)]
    pub stop_minutes: HashMap<Uuid, u32>,
}
