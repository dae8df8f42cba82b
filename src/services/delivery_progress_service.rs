//! Servicio de progreso de entregas
//!
//! Capa fina sobre la máquina de estados de `Route`: aplica `mark_delivered`,
//! registra la transición y devuelve un resultado con la instantánea de la
//! ruta para la capa de presentación.

use serde::Serialize;

use crate::models::route::{Route, RouteProgress, Stop, StopId};
use crate::utils::errors::DeliveryError;

/// Resultado de completar una parada
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    pub completed: Stop,
    pub next_current: Option<Stop>,
    pub progress: RouteProgress,
    pub route_completed: bool,
    pub route: Route,
}

pub struct DeliveryProgressService;

impl DeliveryProgressService {
    /// Marcar una parada como entregada y devolver la ruta actualizada
    pub fn mark_delivered(route: &mut Route, stop_id: StopId) -> Result<DeliveryOutcome, DeliveryError> {
        let route_id = route.id();
        let completed = route.mark_delivered(stop_id).cloned().map_err(|e| {
            log::warn!("🚫 Ruta {}: no se puede entregar la parada {}: {}", route_id, stop_id, e);
            e
        })?;

        let progress = route.progress();
        let next_current = route.current_stop().cloned();
        let route_completed = route.is_terminal();

        match &next_current {
            Some(next) => log::info!(
                "📦 Ruta {}: parada #{} entregada, siguiente #{} ({}/{})",
                route.id(),
                completed.order,
                next.order,
                progress.completed_count,
                progress.total_count
            ),
            None => log::info!(
                "🏁 Ruta {}: parada #{} entregada, ruta completada",
                route.id(),
                completed.order
            ),
        }

        Ok(DeliveryOutcome {
            completed,
            next_current,
            progress,
            route_completed,
            route: route.clone(),
        })
    }

    /// Métricas agregadas de la ruta
    pub fn progress(route: &Route) -> RouteProgress {
        route.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{Order, OrderId, OrderStatus, Priority};
    use crate::models::route::StopStatus;
    use crate::services::route_sequencing_service::build_route;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn route_of(n: u32) -> Route {
        let orders: Vec<Order> = (0..n)
            .map(|i| Order {
                id: OrderId::new(),
                client_name: format!("client-{}", i),
                phone: None,
                address: format!("{} Elizabetes iela, Riga", i + 1),
                requested_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                requested_time: NaiveTime::from_hms_opt(9 + i, 0, 0).unwrap(),
                priority: Priority::Normal,
                status: OrderStatus::Confirmed,
                notes: None,
                original_text: None,
                created_at: Utc::now(),
            })
            .collect();
        build_route(&orders).unwrap()
    }

    #[test]
    fn outcome_reports_the_promoted_stop() {
        let mut route = route_of(3);
        let first = route.stops()[0].id;

        let outcome = DeliveryProgressService::mark_delivered(&mut route, first).unwrap();
        assert_eq!(outcome.completed.status, StopStatus::Completed);
        assert_eq!(outcome.next_current.as_ref().map(|s| s.order), Some(2));
        assert!(!outcome.route_completed);
        assert_eq!(outcome.progress.completed_count, 1);
        assert_eq!(outcome.route, route);
    }

    #[test]
    fn last_delivery_completes_the_route() {
        let mut route = route_of(1);
        let only = route.stops()[0].id;

        let outcome = DeliveryProgressService::mark_delivered(&mut route, only).unwrap();
        assert!(outcome.route_completed);
        assert!(outcome.next_current.is_none());
        assert_eq!(DeliveryProgressService::progress(&route).progress_fraction, 1.0);
    }

    #[test]
    fn failed_delivery_returns_the_error() {
        let mut route = route_of(2);
        let second = route.stops()[1].id;
        let err = DeliveryProgressService::mark_delivered(&mut route, second).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidTransition(_)));
    }

    #[test]
    fn progress_fraction_tracks_completed_share() {
        let mut route = route_of(4);
        assert_eq!(DeliveryProgressService::progress(&route).progress_fraction, 0.0);

        let first = route.stops()[0].id;
        DeliveryProgressService::mark_delivered(&mut route, first).unwrap();
        assert_eq!(DeliveryProgressService::progress(&route).progress_fraction, 0.25);
    }
}
