//! Modelos del sistema
//!
//! Pedidos, rutas con sus paradas y los eventos publicados por el store.

pub mod events;
pub mod order;
pub mod route;

pub use events::StoreEvent;
pub use order::{Order, OrderDraft, OrderId, OrderStats, OrderStatus, Priority};
pub use route::{Route, RouteEstimates, RouteId, RouteProgress, Stop, StopId, StopStatus};
