//! Servicio de intake de pedidos
//!
//! `OrderBook` valida los borradores que llegan del servicio de transcripción
//! (o del formulario manual), crea pedidos `unconfirmed` y aplica las
//! transiciones de confirmación y rechazo.

use chrono::Utc;
use validator::Validate;

use crate::models::order::{Order, OrderDraft, OrderId, OrderStats, OrderStatus};
use crate::utils::errors::{not_found_error, validation_error, AppResult, DeliveryError};
use crate::utils::validation::{normalize_whitespace, parse_date, parse_time};

/// Conjunto de pedidos en orden de llegada
#[derive(Debug, Default, Clone)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validar un borrador y registrarlo como pedido `unconfirmed`
    pub fn intake(&mut self, draft: OrderDraft) -> AppResult<Order> {
        let order = order_from_draft(draft)?;
        log::info!("📝 Pedido {} registrado para {}", order.id, order.client_name);
        self.orders.push(order.clone());
        Ok(order)
    }

    pub fn get(&self, order_id: OrderId) -> Result<&Order, DeliveryError> {
        self.orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| not_found_error("Order", &order_id.to_string()))
    }

    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn confirmed_orders(&self) -> Vec<Order> {
        self.orders.iter().filter(|o| o.is_confirmed()).cloned().collect()
    }

    /// `unconfirmed → confirmed`
    pub fn confirm(&mut self, order_id: OrderId) -> Result<Order, DeliveryError> {
        let order = self.get_mut(order_id)?;
        if order.status != OrderStatus::Unconfirmed {
            return Err(DeliveryError::InvalidTransition(format!(
                "order '{}' is already {}",
                order_id, order.status
            )));
        }
        order.status = OrderStatus::Confirmed;
        log::info!("✅ Pedido {} confirmado", order_id);
        Ok(order.clone())
    }

    /// Eliminar el pedido sea cual sea su estado
    pub fn reject(&mut self, order_id: OrderId) -> Result<(), DeliveryError> {
        let index = self
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| not_found_error("Order", &order_id.to_string()))?;
        let removed = self.orders.remove(index);
        log::info!("🗑️ Pedido {} rechazado (estaba {})", order_id, removed.status);
        Ok(())
    }

    /// `confirmed → in_route` para todos los pedidos de una ruta recién creada.
    ///
    /// Se valida el lote completo antes de mutar: o pasan todos o ninguno.
    pub fn mark_in_route(&mut self, order_ids: &[OrderId]) -> Result<(), DeliveryError> {
        for id in order_ids {
            let order = self.get(*id)?;
            if order.status != OrderStatus::Confirmed {
                return Err(DeliveryError::InvalidTransition(format!(
                    "order '{}' is {}, only confirmed orders can be routed",
                    id, order.status
                )));
            }
        }
        for id in order_ids {
            self.get_mut(*id)?.status = OrderStatus::InRoute;
        }
        Ok(())
    }

    /// `in_route → delivered` cuando su parada se completa
    pub fn mark_delivered(&mut self, order_id: OrderId) -> Result<(), DeliveryError> {
        let order = self.get_mut(order_id)?;
        if order.status != OrderStatus::InRoute {
            return Err(DeliveryError::InvalidTransition(format!(
                "order '{}' is {}, only routed orders can be delivered",
                order_id, order.status
            )));
        }
        order.status = OrderStatus::Delivered;
        Ok(())
    }

    pub fn stats(&self) -> OrderStats {
        let count = |status: OrderStatus| self.orders.iter().filter(|o| o.status == status).count();
        let confirmed = count(OrderStatus::Confirmed);
        OrderStats {
            unconfirmed: count(OrderStatus::Unconfirmed),
            confirmed,
            in_route: count(OrderStatus::InRoute),
            delivered: count(OrderStatus::Delivered),
            routes_ready: usize::from(confirmed > 0),
        }
    }

    fn get_mut(&mut self, order_id: OrderId) -> Result<&mut Order, DeliveryError> {
        self.orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| not_found_error("Order", &order_id.to_string()))
    }
}

/// Convertir un borrador validado en pedido normalizado
pub fn order_from_draft(draft: OrderDraft) -> AppResult<Order> {
    draft.validate()?;

    let requested_date =
        parse_date(&draft.date).map_err(|_| validation_error("date", "expected YYYY-MM-DD"))?;
    let requested_time =
        parse_time(&draft.time).map_err(|_| validation_error("time", "expected HH:MM"))?;

    let non_empty = |value: Option<String>| {
        value
            .map(|v| normalize_whitespace(&v))
            .filter(|v| !v.is_empty())
    };

    Ok(Order {
        id: OrderId::new(),
        client_name: normalize_whitespace(&draft.client_name),
        phone: non_empty(draft.phone),
        address: normalize_whitespace(&draft.address),
        requested_date,
        requested_time,
        priority: draft.priority.unwrap_or_default(),
        status: OrderStatus::Unconfirmed,
        notes: non_empty(draft.notes),
        original_text: draft.original_text,
        created_at: Utc::now(),
    })
}
