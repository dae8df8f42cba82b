//! Eventos del store
//!
//! Cada mutación del store publica un evento con datos por valor para que las
//! vistas se actualicen sin compartir estado mutable.

use serde::Serialize;

use crate::models::order::{Order, OrderId};
use crate::models::route::{RouteId, RouteProgress, StopId};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    OrderCreated { order: Order },
    OrderConfirmed { order: Order },
    OrderRejected { order_id: OrderId },
    RouteCreated { route_id: RouteId, progress: RouteProgress },
    StopCompleted { route_id: RouteId, stop_id: StopId, progress: RouteProgress },
    RouteResequenced { route_id: RouteId },
    RouteCompleted { route_id: RouteId },
}

impl StoreEvent {
    /// Nombre del evento para SSE y logs
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::OrderCreated { .. } => "order_created",
            StoreEvent::OrderConfirmed { .. } => "order_confirmed",
            StoreEvent::OrderRejected { .. } => "order_rejected",
            StoreEvent::RouteCreated { .. } => "route_created",
            StoreEvent::StopCompleted { .. } => "stop_completed",
            StoreEvent::RouteResequenced { .. } => "route_resequenced",
            StoreEvent::RouteCompleted { .. } => "route_completed",
        }
    }
}
