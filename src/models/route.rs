//! Modelo de Route
//!
//! Una ruta es una secuencia ordenada de paradas creada a partir de pedidos
//! confirmados. La ruta es dueña exclusiva de sus paradas y mantiene las
//! invariantes de la máquina de estados de entrega:
//!
//! - los valores `order` forman la permutación `1..=N`, sin huecos ni
//!   duplicados, y el vector de paradas está ordenado por `order`;
//! - hay exactamente una parada `current` salvo en el estado terminal
//!   (todas `completed`), donde no hay ninguna;
//! - cada parada avanza `pending → current → completed` sin saltos ni
//!   retrocesos.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

use crate::models::order::{Order, OrderId, Priority};
use crate::utils::errors::{not_found_error, DeliveryError};

/// Duración estimada por defecto de una parada
pub const DEFAULT_STOP_DURATION_MINUTES: u32 = 10;

/// Identificador único de parada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub Uuid);

impl StopId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StopId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for StopId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Identificador único de ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub Uuid);

impl RouteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for RouteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Estado de entrega de una parada (independiente de `OrderStatus`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Pending,
    Current,
    Completed,
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopStatus::Pending => "pending",
            StopStatus::Current => "current",
            StopStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Parada de una ruta (copia por valor del pedido confirmado)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub order_id: OrderId,
    /// Posición 1-based dentro de la ruta
    pub order: u32,
    pub client_name: String,
    pub phone: Option<String>,
    pub address: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub priority: Priority,
    pub notes: Option<String>,
    pub estimated_duration_minutes: Option<u32>,
    pub status: StopStatus,
}

impl Stop {
    fn from_order(order: &Order) -> Self {
        Self {
            id: StopId::new(),
            order_id: order.id,
            order: 0,
            client_name: order.client_name.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
            scheduled_date: order.requested_date,
            scheduled_time: order.requested_time,
            priority: order.priority,
            notes: order.notes.clone(),
            estimated_duration_minutes: Some(DEFAULT_STOP_DURATION_MINUTES),
            status: StopStatus::Pending,
        }
    }
}

/// Cifras de cabecera propuestas por el optimizador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimates {
    pub total_distance_km: f64,
    pub total_duration_minutes: u32,
    pub time_saved_minutes: u32,
}

/// Métricas agregadas, recalculadas en cada consulta
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteProgress {
    pub completed_count: usize,
    pub current_count: usize,
    pub pending_count: usize,
    pub total_count: usize,
    pub progress_fraction: f64,
}

/// Ruta de entrega
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    id: RouteId,
    stops: Vec<Stop>,
    estimates: Option<RouteEstimates>,
    created_at: DateTime<Utc>,
}

impl Route {
    /// Crear una ruta activa a partir de pedidos ya puestos en orden de visita.
    ///
    /// Asigna `order = 1..=N`; la primera parada queda `current` y el resto
    /// `pending`.
    pub(crate) fn activate(
        orders_in_visit_order: &[&Order],
        estimates: Option<RouteEstimates>,
    ) -> Result<Self, DeliveryError> {
        if orders_in_visit_order.is_empty() {
            return Err(DeliveryError::EmptyInput(
                "a route cannot be built from zero stops".to_string(),
            ));
        }

        let stops = orders_in_visit_order
            .iter()
            .zip(1u32..)
            .map(|(order, position)| {
                let mut stop = Stop::from_order(order);
                stop.order = position;
                stop.status = if position == 1 {
                    StopStatus::Current
                } else {
                    StopStatus::Pending
                };
                stop
            })
            .collect();

        Ok(Self {
            id: RouteId::new(),
            stops,
            estimates,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Paradas ordenadas por `order`
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn estimates(&self) -> Option<&RouteEstimates> {
        self.estimates.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn stop(&self, stop_id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == stop_id)
    }

    pub fn current_stop(&self) -> Option<&Stop> {
        self.stops.iter().find(|s| s.status == StopStatus::Current)
    }

    /// Todas las paradas completadas
    pub fn is_terminal(&self) -> bool {
        self.stops.iter().all(|s| s.status == StopStatus::Completed)
    }

    pub fn progress(&self) -> RouteProgress {
        let count = |status: StopStatus| self.stops.iter().filter(|s| s.status == status).count();
        let completed_count = count(StopStatus::Completed);
        let total_count = self.stops.len();
        let progress_fraction = if total_count == 0 {
            0.0
        } else {
            completed_count as f64 / total_count as f64
        };

        RouteProgress {
            completed_count,
            current_count: count(StopStatus::Current),
            pending_count: count(StopStatus::Pending),
            total_count,
            progress_fraction,
        }
    }

    /// Marcar como entregada la parada `current` y promover la siguiente.
    ///
    /// La siguiente parada se localiza por `order + 1`, nunca por posición en
    /// el vector. Si la parada no es `current` el estado no cambia.
    pub fn mark_delivered(&mut self, stop_id: StopId) -> Result<&Stop, DeliveryError> {
        let index = self
            .stops
            .iter()
            .position(|s| s.id == stop_id)
            .ok_or_else(|| not_found_error("Stop", &stop_id.to_string()))?;

        let target = &self.stops[index];
        if target.status != StopStatus::Current {
            return Err(DeliveryError::InvalidTransition(format!(
                "stop #{} is {}, only the current stop can be delivered",
                target.order, target.status
            )));
        }

        let next_order = target.order + 1;
        self.stops[index].status = StopStatus::Completed;

        if let Some(next) = self.stops.iter_mut().find(|s| s.order == next_order) {
            if next.status == StopStatus::Pending {
                next.status = StopStatus::Current;
            }
        }

        Ok(&self.stops[index])
    }

    /// Aplicar duraciones por parada propuestas por el optimizador.
    ///
    /// Solo cambian las paradas no completadas cuyo pedido aparece en
    /// `minutes_by_order`; el resto conserva su estimación.
    pub(crate) fn apply_stop_durations(&mut self, minutes_by_order: &HashMap<OrderId, u32>) {
        for stop in self.stops.iter_mut().filter(|s| s.status != StopStatus::Completed) {
            if let Some(minutes) = minutes_by_order.get(&stop.order_id) {
                stop.estimated_duration_minutes = Some(*minutes);
            }
        }
    }

    /// Paradas aún no completadas, en orden de visita
    pub fn remaining_stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|s| s.status != StopStatus::Completed)
    }

    /// Reordenar las paradas aún no completadas de una ruta en curso.
    ///
    /// `sequence` debe ser una permutación exacta de las paradas restantes
    /// (`current` y `pending`). Las completadas conservan `1..=k`; las
    /// restantes reciben `k+1..=N`, vuelven a `pending` y la primera de la
    /// nueva secuencia pasa a `current`.
    pub fn resequence_remaining(&mut self, sequence: &[StopId]) -> Result<(), DeliveryError> {
        if self.is_terminal() {
            return Err(DeliveryError::InvalidTransition(
                "route is already fully delivered".to_string(),
            ));
        }

        let remaining: HashSet<StopId> = self
            .stops
            .iter()
            .filter(|s| s.status != StopStatus::Completed)
            .map(|s| s.id)
            .collect();
        let proposed: HashSet<StopId> = sequence.iter().copied().collect();

        if proposed.len() != sequence.len() {
            return Err(DeliveryError::InvalidSequence(
                "sequence contains duplicate stops".to_string(),
            ));
        }
        if proposed != remaining {
            return Err(DeliveryError::InvalidSequence(format!(
                "sequence must list exactly the {} remaining stops",
                remaining.len()
            )));
        }

        let first_remaining_order = (self.stops.len() - remaining.len() + 1) as u32;
        for (stop_id, position) in sequence.iter().zip(first_remaining_order..) {
            if let Some(stop) = self.stops.iter_mut().find(|s| s.id == *stop_id) {
                stop.order = position;
                stop.status = if position == first_remaining_order {
                    StopStatus::Current
                } else {
                    StopStatus::Pending
                };
            }
        }
        self.stops.sort_by_key(|s| s.order);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderStatus;

    fn confirmed_order(name: &str) -> Order {
        Order {
            id: OrderId::new(),
            client_name: name.to_string(),
            phone: None,
            address: format!("{} street", name),
            requested_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            requested_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            priority: Priority::Normal,
            status: OrderStatus::Confirmed,
            notes: None,
            original_text: None,
            created_at: Utc::now(),
        }
    }

    fn route_of(n: usize) -> Route {
        let orders: Vec<Order> = (0..n).map(|i| confirmed_order(&format!("client-{}", i))).collect();
        let refs: Vec<&Order> = orders.iter().collect();
        Route::activate(&refs, None).unwrap()
    }

    fn statuses(route: &Route) -> Vec<StopStatus> {
        route.stops().iter().map(|s| s.status).collect()
    }

    #[test]
    fn activation_marks_first_stop_current() {
        let route = route_of(3);
        assert_eq!(
            statuses(&route),
            vec![StopStatus::Current, StopStatus::Pending, StopStatus::Pending]
        );
        let orders: Vec<u32> = route.stops().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn activation_rejects_empty_input() {
        let err = Route::activate(&[], None).unwrap_err();
        assert!(matches!(err, DeliveryError::EmptyInput(_)));
    }

    #[test]
    fn three_stop_scenario_reaches_terminal_state() {
        let mut route = route_of(3);
        let ids: Vec<StopId> = route.stops().iter().map(|s| s.id).collect();

        route.mark_delivered(ids[0]).unwrap();
        assert_eq!(
            statuses(&route),
            vec![StopStatus::Completed, StopStatus::Current, StopStatus::Pending]
        );

        route.mark_delivered(ids[1]).unwrap();
        assert_eq!(
            statuses(&route),
            vec![StopStatus::Completed, StopStatus::Completed, StopStatus::Current]
        );

        route.mark_delivered(ids[2]).unwrap();
        assert!(route.is_terminal());
        assert!(route.current_stop().is_none());
        assert_eq!(route.progress().progress_fraction, 1.0);
    }

    #[test]
    fn delivering_twice_fails_and_leaves_state_unchanged() {
        let mut route = route_of(2);
        let first = route.stops()[0].id;

        route.mark_delivered(first).unwrap();
        let before = route.clone();

        let err = route.mark_delivered(first).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidTransition(_)));
        assert_eq!(route, before);
    }

    #[test]
    fn pending_stop_cannot_be_delivered() {
        let mut route = route_of(3);
        let third = route.stops()[2].id;
        let err = route.mark_delivered(third).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidTransition(_)));
        assert_eq!(route.progress().completed_count, 0);
    }

    #[test]
    fn unknown_stop_is_not_found() {
        let mut route = route_of(1);
        let err = route.mark_delivered(StopId::new()).unwrap_err();
        assert!(matches!(err, DeliveryError::NotFound(_)));
    }

    #[test]
    fn terminal_route_rejects_every_delivery() {
        let mut route = route_of(2);
        let ids: Vec<StopId> = route.stops().iter().map(|s| s.id).collect();
        for id in &ids {
            route.mark_delivered(*id).unwrap();
        }
        for id in &ids {
            assert!(matches!(
                route.mark_delivered(*id),
                Err(DeliveryError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn exactly_one_current_until_terminal_and_progress_never_decreases() {
        let mut route = route_of(5);
        let mut last_fraction = route.progress().progress_fraction;

        while !route.is_terminal() {
            let progress = route.progress();
            assert_eq!(progress.current_count, 1);
            assert_eq!(
                progress.completed_count + progress.current_count + progress.pending_count,
                progress.total_count
            );

            let current = route.current_stop().unwrap().id;
            route.mark_delivered(current).unwrap();

            let fraction = route.progress().progress_fraction;
            assert!(fraction >= last_fraction);
            last_fraction = fraction;
        }

        assert_eq!(route.progress().current_count, 0);
        assert_eq!(last_fraction, 1.0);
    }

    #[test]
    fn resequencing_after_a_delivery_promotes_the_new_first_stop() {
        let mut route = route_of(3);
        let ids: Vec<StopId> = route.stops().iter().map(|s| s.id).collect();
        route.mark_delivered(ids[0]).unwrap();

        route.resequence_remaining(&[ids[2], ids[1]]).unwrap();

        assert_eq!(route.current_stop().unwrap().id, ids[2]);
        let order_of = |id: StopId| route.stop(id).unwrap().order;
        assert_eq!(order_of(ids[0]), 1);
        assert_eq!(order_of(ids[2]), 2);
        assert_eq!(order_of(ids[1]), 3);
        assert_eq!(
            statuses(&route),
            vec![StopStatus::Completed, StopStatus::Current, StopStatus::Pending]
        );

        // la promoción sigue los nuevos valores de order
        route.mark_delivered(ids[2]).unwrap();
        assert_eq!(route.current_stop().unwrap().id, ids[1]);
        route.mark_delivered(ids[1]).unwrap();
        assert!(route.is_terminal());
    }

    #[test]
    fn resequencing_keeps_completed_stops_and_a_single_current() {
        let mut route = route_of(4);
        let ids: Vec<StopId> = route.stops().iter().map(|s| s.id).collect();
        route.mark_delivered(ids[0]).unwrap();

        // ids[1] sigue siendo el primero: se queda current
        route.resequence_remaining(&[ids[1], ids[3], ids[2]]).unwrap();

        assert_eq!(route.progress().current_count, 1);
        assert_eq!(route.current_stop().unwrap().id, ids[1]);
        assert_eq!(route.stop(ids[0]).unwrap().status, StopStatus::Completed);
        assert_eq!(route.stop(ids[3]).unwrap().order, 3);
        assert_eq!(route.stop(ids[2]).unwrap().order, 4);

        route.mark_delivered(ids[1]).unwrap();
        assert_eq!(route.current_stop().unwrap().id, ids[3]);
    }

    #[test]
    fn resequencing_rejects_non_permutations() {
        let mut route = route_of(3);
        let ids: Vec<StopId> = route.stops().iter().map(|s| s.id).collect();
        route.mark_delivered(ids[0]).unwrap();
        let before = route.clone();

        let missing = route.resequence_remaining(&[ids[1]]).unwrap_err();
        assert!(matches!(missing, DeliveryError::InvalidSequence(_)));

        let duplicated = route.resequence_remaining(&[ids[1], ids[1]]).unwrap_err();
        assert!(matches!(duplicated, DeliveryError::InvalidSequence(_)));

        let includes_completed = route.resequence_remaining(&[ids[0], ids[1], ids[2]]).unwrap_err();
        assert!(matches!(includes_completed, DeliveryError::InvalidSequence(_)));

        assert_eq!(route, before);
    }

    #[test]
    fn terminal_route_cannot_be_resequenced() {
        let mut route = route_of(1);
        let id = route.stops()[0].id;
        route.mark_delivered(id).unwrap();
        assert!(matches!(
            route.resequence_remaining(&[]),
            Err(DeliveryError::InvalidTransition(_))
        ));
    }

    #[test]
    fn optimizer_durations_override_the_default_for_remaining_stops() {
        let mut route = route_of(3);
        let stops: Vec<(StopId, OrderId)> = route.stops().iter().map(|s| (s.id, s.order_id)).collect();
        route.mark_delivered(stops[0].0).unwrap();

        let minutes: HashMap<OrderId, u32> =
            [(stops[0].1, 99), (stops[2].1, 12)].into_iter().collect();
        route.apply_stop_durations(&minutes);

        let duration_of = |id: StopId| route.stop(id).unwrap().estimated_duration_minutes;
        assert_eq!(duration_of(stops[0].0), Some(DEFAULT_STOP_DURATION_MINUTES));
        assert_eq!(duration_of(stops[1].0), Some(DEFAULT_STOP_DURATION_MINUTES));
        assert_eq!(duration_of(stops[2].0), Some(12));
        assert_eq!(route.remaining_stops().count(), 2);
    }
}
