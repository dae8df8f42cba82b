//! Voice delivery backend
//!
//! Pedidos dictados por voz, confirmación manual, planificación de rutas y
//! seguimiento de entregas parada por parada.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
