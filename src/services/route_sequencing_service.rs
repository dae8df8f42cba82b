//! Servicio de secuenciación de rutas
//!
//! Convierte pedidos confirmados en una ruta activa. El orden de visita lo
//! decide el optimizador externo; aquí solo se garantiza que el orden recibido
//! es una permutación de los pedidos y que la ruta resultante cumple sus
//! invariantes.

use std::collections::{HashMap, HashSet};

use crate::models::order::{Order, OrderId, OrderStatus, Priority};
use crate::models::route::{Route, RouteEstimates, StopId};
use crate::utils::errors::DeliveryError;

/// Secuencia por defecto cuando no hay propuesta del optimizador:
/// fecha, urgentes primero, hora. Estable respecto al orden de entrada.
pub fn default_sequence(orders: &[Order]) -> Vec<OrderId> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by_key(|o| {
        (
            o.requested_date,
            o.priority != Priority::Urgent,
            o.requested_time,
        )
    });
    sorted.into_iter().map(|o| o.id).collect()
}

/// Construir una ruta con la secuencia por defecto
pub fn build_route(confirmed_orders: &[Order]) -> Result<Route, DeliveryError> {
    let sequence = default_sequence(confirmed_orders);
    build_route_with_sequence(confirmed_orders, &sequence, None)
}

/// Construir una ruta siguiendo una secuencia externa.
///
/// `sequence` debe contener cada pedido exactamente una vez.
pub fn build_route_with_sequence(
    confirmed_orders: &[Order],
    sequence: &[OrderId],
    estimates: Option<RouteEstimates>,
) -> Result<Route, DeliveryError> {
    if confirmed_orders.is_empty() {
        return Err(DeliveryError::EmptyInput(
            "a route cannot be built from zero confirmed orders".to_string(),
        ));
    }

    if let Some(order) = confirmed_orders
        .iter()
        .find(|o| o.status != OrderStatus::Confirmed)
    {
        return Err(DeliveryError::InvalidTransition(format!(
            "order '{}' is {}, only confirmed orders can be routed",
            order.id, order.status
        )));
    }

    let by_id: HashMap<OrderId, &Order> = confirmed_orders.iter().map(|o| (o.id, o)).collect();
    if by_id.len() != confirmed_orders.len() {
        return Err(DeliveryError::InvalidSequence(
            "input contains the same order twice".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(sequence.len());
    let mut visit_order = Vec::with_capacity(sequence.len());
    for id in sequence {
        let order = by_id.get(id).ok_or_else(|| {
            DeliveryError::InvalidSequence(format!("order '{}' is not part of this route", id))
        })?;
        if !seen.insert(*id) {
            return Err(DeliveryError::InvalidSequence(format!(
                "order '{}' appears more than once",
                id
            )));
        }
        visit_order.push(*order);
    }

    if visit_order.len() != confirmed_orders.len() {
        return Err(DeliveryError::InvalidSequence(format!(
            "sequence covers {} of {} orders",
            visit_order.len(),
            confirmed_orders.len()
        )));
    }

    let route = Route::activate(&visit_order, estimates)?;
    log::info!("🗺️ Ruta {} creada con {} paradas", route.id(), route.stops().len());
    Ok(route)
}

/// Reordenar las paradas restantes de una ruta en curso
pub fn resequence_remaining(route: &mut Route, sequence: &[StopId]) -> Result<(), DeliveryError> {
    route.resequence_remaining(sequence)?;
    log::info!("🔀 Ruta {} resecuenciada ({} paradas restantes)", route.id(), sequence.len());
    Ok(())
}

/// Traducir una secuencia de pedidos a las paradas restantes de la ruta.
///
/// Un pedido que no corresponde a una parada restante invalida la secuencia.
pub fn stop_sequence_for_orders(route: &Route, sequence: &[OrderId]) -> Result<Vec<StopId>, DeliveryError> {
    let by_order: HashMap<OrderId, StopId> = route.remaining_stops().map(|s| (s.order_id, s.id)).collect();
    sequence
        .iter()
        .map(|order_id| {
            by_order.get(order_id).copied().ok_or_else(|| {
                DeliveryError::InvalidSequence(format!(
                    "order '{}' is not a remaining stop of route '{}'",
                    order_id,
                    route.id()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::StopStatus;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn order(name: &str, day: u32, hour: u32, priority: Priority) -> Order {
        Order {
            id: OrderId::new(),
            client_name: name.to_string(),
            phone: None,
            address: format!("{} iela 1, Riga", name),
            requested_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            requested_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            priority,
            status: OrderStatus::Confirmed,
            notes: None,
            original_text: None,
            created_at: Utc::now(),
        }
    }

    fn three_orders() -> Vec<Order> {
        vec![
            order("Anna", 15, 10, Priority::Normal),
            order("Janis", 15, 14, Priority::Urgent),
            order("Marta", 15, 16, Priority::Normal),
        ]
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(build_route(&[]), Err(DeliveryError::EmptyInput(_))));
        assert!(matches!(
            build_route_with_sequence(&[], &[], None),
            Err(DeliveryError::EmptyInput(_))
        ));
    }

    #[test]
    fn orders_form_a_permutation_of_one_to_n() {
        for n in 1..=6 {
            let orders: Vec<Order> = (0..n)
                .map(|i| order(&format!("c{}", i), 15 + (i as u32 % 3), 9 + i as u32, Priority::Normal))
                .collect();
            let route = build_route(&orders).unwrap();

            let mut positions: Vec<u32> = route.stops().iter().map(|s| s.order).collect();
            positions.sort_unstable();
            assert_eq!(positions, (1..=n as u32).collect::<Vec<_>>());
            assert_eq!(route.progress().current_count, 1);
        }
    }

    #[test]
    fn default_sequence_puts_urgent_first_within_a_day() {
        let orders = three_orders();
        let sequence = default_sequence(&orders);
        assert_eq!(sequence, vec![orders[1].id, orders[0].id, orders[2].id]);
    }

    #[test]
    fn default_sequence_keeps_earlier_days_first() {
        let orders = vec![
            order("Later", 16, 8, Priority::Urgent),
            order("Sooner", 15, 18, Priority::Normal),
        ];
        assert_eq!(default_sequence(&orders), vec![orders[1].id, orders[0].id]);
    }

    #[test]
    fn external_sequence_is_respected() {
        let orders = three_orders();
        let sequence = vec![orders[2].id, orders[0].id, orders[1].id];
        let route = build_route_with_sequence(&orders, &sequence, None).unwrap();

        let visited: Vec<OrderId> = route.stops().iter().map(|s| s.order_id).collect();
        assert_eq!(visited, sequence);
        assert_eq!(route.stops()[0].status, StopStatus::Current);
        assert_eq!(route.stops()[0].client_name, "Marta");
    }

    #[test]
    fn non_permutation_sequences_are_rejected() {
        let orders = three_orders();

        let short = build_route_with_sequence(&orders, &[orders[0].id], None);
        assert!(matches!(short, Err(DeliveryError::InvalidSequence(_))));

        let duplicated = build_route_with_sequence(
            &orders,
            &[orders[0].id, orders[0].id, orders[1].id],
            None,
        );
        assert!(matches!(duplicated, Err(DeliveryError::InvalidSequence(_))));

        let foreign = build_route_with_sequence(
            &orders,
            &[orders[0].id, orders[1].id, OrderId::new()],
            None,
        );
        assert!(matches!(foreign, Err(DeliveryError::InvalidSequence(_))));
    }

    #[test]
    fn unconfirmed_orders_cannot_be_routed() {
        let mut orders = three_orders();
        orders[1].status = OrderStatus::Unconfirmed;
        assert!(matches!(
            build_route(&orders),
            Err(DeliveryError::InvalidTransition(_))
        ));
    }

    #[test]
    fn estimates_are_kept_on_the_route() {
        let orders = three_orders();
        let estimates = RouteEstimates {
            total_distance_km: 24.5,
            total_duration_minutes: 135,
            time_saved_minutes: 35,
        };
        let sequence = default_sequence(&orders);
        let route = build_route_with_sequence(&orders, &sequence, Some(estimates.clone())).unwrap();
        assert_eq!(route.estimates(), Some(&estimates));
    }

    #[test]
    fn order_sequence_maps_to_remaining_stops() {
        let orders = three_orders();
        let mut route = build_route(&orders).unwrap();
        let first = route.stops()[0].clone();
        route.mark_delivered(first.id).unwrap();

        let remaining: Vec<OrderId> = route.remaining_stops().map(|s| s.order_id).collect::<Vec<_>>().into_iter().rev().collect();
        let stops = stop_sequence_for_orders(&route, &remaining).unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(route.stops()[2].id, stops[0]);

        let with_completed = stop_sequence_for_orders(&route, &[first.order_id]);
        assert!(matches!(with_completed, Err(DeliveryError::InvalidSequence(_))));
    }
}
