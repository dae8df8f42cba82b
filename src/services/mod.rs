//! Services module
//!
//! Lógica de negocio pura sobre pedidos y rutas. Ningún servicio hace I/O;
//! el store central los invoca bajo su lock de escritura.

pub mod delivery_progress_service;
pub mod order_intake_service;
pub mod route_sequencing_service;

pub use delivery_progress_service::{DeliveryOutcome, DeliveryProgressService};
pub use order_intake_service::OrderBook;
pub use route_sequencing_service::{
    build_route, build_route_with_sequence, default_sequence, resequence_remaining,
    stop_sequence_for_orders,
};
