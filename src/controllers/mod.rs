//! Controladores
//!
//! Orquestan el store central y los colaboradores externos para cada
//! endpoint de la API.

pub mod order_controller;
pub mod route_controller;
pub mod voice_controller;
