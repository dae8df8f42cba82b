//! Sistema de manejo de errores
//!
//! Este módulo define los errores del modelo de entregas y los errores
//! de la aplicación, junto con su conversión a respuestas HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores del modelo de ciclo de vida de entregas.
///
/// Todos son recuperables por el llamador; ninguno se reintenta en esta capa.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código de estado HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Delivery(DeliveryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Delivery(DeliveryError::EmptyInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Delivery(DeliveryError::InvalidTransition(_)) => StatusCode::CONFLICT,
            AppError::Delivery(DeliveryError::InvalidSequence(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Delivery(e) => {
                log::warn!("⚠️ Delivery model rejected operation: {}", e);
                match e {
                    DeliveryError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
                    DeliveryError::EmptyInput(msg) => ErrorResponse::new("Empty Input", msg, "EMPTY_INPUT"),
                    DeliveryError::InvalidTransition(msg) => {
                        ErrorResponse::new("Invalid Transition", msg, "INVALID_TRANSITION")
                    }
                    DeliveryError::InvalidSequence(msg) => {
                        ErrorResponse::new("Invalid Sequence", msg, "INVALID_SEQUENCE")
                    }
                }
            }

            AppError::Validation(e) => {
                log::warn!("⚠️ Order draft rejected: {}", e);
                ErrorResponse::new("Validation Error", "The order draft is invalid".to_string(), "VALIDATION_ERROR")
                    .with_details(json!(e))
            }

            AppError::BadRequest(msg) => {
                log::warn!("⚠️ Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST")
            }

            AppError::ExternalApi(msg) => {
                log::error!("❌ Collaborator failed: {}", msg);
                ErrorResponse::new("Bad Gateway", "A collaborator service failed".to_string(), "EXTERNAL_API_ERROR")
                    .with_details(json!({ "collaborator_error": msg }))
            }

            AppError::Timeout(msg) => {
                log::error!("⏱️ Timeout: {}", msg);
                ErrorResponse::new("Gateway Timeout", msg, "TIMEOUT")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> DeliveryError {
    DeliveryError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_errors_map_to_distinct_status_codes() {
        let not_found: AppError = not_found_error("Order", "abc").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let empty: AppError = DeliveryError::EmptyInput("route".to_string()).into();
        assert_eq!(empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let transition: AppError = DeliveryError::InvalidTransition("stop".to_string()).into();
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);

        assert_eq!(AppError::Timeout("x".into()).status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(AppError::ExternalApi("x".into()).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn not_found_message_names_resource_and_id() {
        let err = not_found_error("Stop", "42");
        assert_eq!(err.to_string(), "Not found: Stop with id '42' not found");
    }

    #[test]
    fn validation_helper_targets_field() {
        match validation_error("date", "bad date") {
            AppError::Validation(errors) => assert!(errors.field_errors().contains_key("date")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
