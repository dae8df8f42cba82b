//! Middleware del sistema
//!
//! Capas HTTP comunes a todos los routers.

pub mod cors;

pub use cors::*;
