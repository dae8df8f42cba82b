//! Modelo de Order
//!
//! Pedido de entrega capturado desde una llamada de voz o introducido a mano,
//! antes de ser secuenciado en una ruta.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_date, validate_not_blank, validate_phone, validate_time};

/// Identificador único de pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Prioridad del pedido
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

/// Estado del ciclo de vida del pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unconfirmed,
    Confirmed,
    InRoute,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unconfirmed => "unconfirmed",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InRoute => "in_route",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pedido validado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_name: String,
    pub phone: Option<String>,
    pub address: String,
    pub requested_date: NaiveDate,
    pub requested_time: NaiveTime,
    pub priority: Priority,
    pub status: OrderStatus,
    pub notes: Option<String>,
    /// Transcripción de la que se extrajo el pedido
    pub original_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }
}

/// Borrador de pedido devuelto por el servicio de transcripción o enviado
/// por el formulario manual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderDraft {
    #[validate(custom = "validate_not_blank", length(max = 120))]
    pub client_name: String,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(custom = "validate_not_blank", length(max = 300))]
    pub address: String,

    /// YYYY-MM-DD
    #[validate(custom = "validate_date")]
    pub date: String,

    /// HH:MM
    #[validate(custom = "validate_time")]
    pub time: String,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    pub original_text: Option<String>,
}

/// Contadores del tablero de pedidos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub unconfirmed: usize,
    pub confirmed: usize,
    pub in_route: usize,
    pub delivered: usize,
    /// 1 si hay pedidos confirmados listos para planificar, 0 si no
    pub routes_ready: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            client_name: "Marta Liepa".to_string(),
            phone: Some("+371 5555 1234".to_string()),
            address: "Valdemāra iela 88, Riga, LV-1013".to_string(),
            date: "2024-01-15".to_string(),
            time: "16:30".to_string(),
            priority: None,
            notes: None,
            original_text: None,
        }
    }

    #[test]
    fn valid_draft_passes_validation() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn draft_reports_every_invalid_field() {
        let mut bad = draft();
        bad.client_name = "  ".to_string();
        bad.phone = Some("n/a".to_string());
        bad.time = "25:99".to_string();

        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("client_name"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("time"));
        assert!(!fields.contains_key("address"));
    }

    #[test]
    fn statuses_serialize_in_snake_case() {
        assert_eq!(serde_json::to_string(&OrderStatus::InRoute).unwrap(), "\"in_route\"");
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        let parsed: Priority = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, Priority::Normal);
    }
}
