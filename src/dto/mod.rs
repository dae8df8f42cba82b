//! DTOs de la API
//!
//! Requests y responses HTTP, y el formato del optimizador externo.

pub mod api_response;
pub mod optimizer_dto;
pub mod order_dto;
pub mod route_dto;

pub use api_response::ApiResponse;
