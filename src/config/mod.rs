//! Configuración del proyecto
//!
//! Este módulo contiene la configuración cargada desde variables de entorno.

pub mod environment;

pub use environment::*;
