//! Shared application state
//!
//! Este módulo define el store central de pedidos y rutas y el estado
//! compartido que se pasa a través del router de Axum.
//!
//! Todas las transiciones del store son síncronas. `AppState` lo guarda tras
//! un `RwLock`; cada mutación toma el lock de escritura durante todo su
//! read-modify-write y nunca lo mantiene a través de una llamada a un
//! colaborador externo.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::clients::{
    HttpRouteOptimizer, MockRouteOptimizer, MockTranscriptionService, OptimizationProposal,
    RouteOptimizer, TranscriptionService,
};
use crate::config::environment::EnvironmentConfig;
use crate::models::events::StoreEvent;
use crate::models::order::{Order, OrderDraft, OrderId, OrderStats};
use crate::models::route::{Route, RouteId, RouteProgress, StopId};
use crate::services::delivery_progress_service::{DeliveryOutcome, DeliveryProgressService};
use crate::services::order_intake_service::OrderBook;
use crate::services::route_sequencing_service::{
    build_route, build_route_with_sequence, resequence_remaining, stop_sequence_for_orders,
};
use crate::utils::errors::{not_found_error, AppResult, DeliveryError};

/// Única fuente de verdad para pedidos y rutas
#[derive(Debug)]
pub struct DeliveryStore {
    orders: OrderBook,
    routes: Vec<Route>,
    events: broadcast::Sender<StoreEvent>,
}

impl DeliveryStore {
    pub fn new(events: broadcast::Sender<StoreEvent>) -> Self {
        Self {
            orders: OrderBook::new(),
            routes: Vec::new(),
            events,
        }
    }

    fn publish(&self, event: StoreEvent) {
        log::debug!("📣 Evento {}", event.name());
        // Sin suscriptores el envío falla; no es un error del store.
        let _ = self.events.send(event);
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.list()
    }

    pub fn order(&self, order_id: OrderId) -> Result<&Order, DeliveryError> {
        self.orders.get(order_id)
    }

    pub fn confirmed_orders(&self) -> Vec<Order> {
        self.orders.confirmed_orders()
    }

    pub fn order_stats(&self) -> OrderStats {
        self.orders.stats()
    }

    pub fn intake(&mut self, draft: OrderDraft) -> AppResult<Order> {
        let order = self.orders.intake(draft)?;
        self.publish(StoreEvent::OrderCreated { order: order.clone() });
        Ok(order)
    }

    pub fn confirm_order(&mut self, order_id: OrderId) -> Result<Order, DeliveryError> {
        let order = self.orders.confirm(order_id)?;
        self.publish(StoreEvent::OrderConfirmed { order: order.clone() });
        Ok(order)
    }

    pub fn reject_order(&mut self, order_id: OrderId) -> Result<(), DeliveryError> {
        self.orders.reject(order_id)?;
        self.publish(StoreEvent::OrderRejected { order_id });
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteId) -> Result<&Route, DeliveryError> {
        self.routes
            .iter()
            .find(|r| r.id() == route_id)
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))
    }

    fn route_mut(&mut self, route_id: RouteId) -> Result<&mut Route, DeliveryError> {
        self.routes
            .iter_mut()
            .find(|r| r.id() == route_id)
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))
    }

    pub fn progress(&self, route_id: RouteId) -> Result<RouteProgress, DeliveryError> {
        self.route(route_id).map(DeliveryProgressService::progress)
    }

    /// Crear una ruta con todos los pedidos confirmados.
    ///
    /// La propuesta se calculó sobre una instantánea anterior; si los pedidos
    /// confirmados cambiaron entretanto, la secuencia deja de ser una
    /// permutación válida y se rechaza.
    pub fn plan_route(&mut self, proposal: Option<OptimizationProposal>) -> Result<Route, DeliveryError> {
        let confirmed = self.orders.confirmed_orders();
        let route = match proposal {
            Some(proposal) => {
                let mut route =
                    build_route_with_sequence(&confirmed, &proposal.sequence, proposal.estimates)?;
                route.apply_stop_durations(&proposal.stop_minutes);
                route
            }
            None => build_route(&confirmed)?,
        };

        let order_ids: Vec<OrderId> = route.stops().iter().map(|s| s.order_id).collect();
        self.orders.mark_in_route(&order_ids)?;

        self.publish(StoreEvent::RouteCreated {
            route_id: route.id(),
            progress: route.progress(),
        });
        self.routes.push(route.clone());
        Ok(route)
    }

    pub fn mark_delivered(&mut self, route_id: RouteId, stop_id: StopId) -> Result<DeliveryOutcome, DeliveryError> {
        let outcome = DeliveryProgressService::mark_delivered(self.route_mut(route_id)?, stop_id)?;

        if let Err(e) = self.orders.mark_delivered(outcome.completed.order_id) {
            // El pedido pudo rechazarse tras crear la ruta; la parada manda.
            log::warn!("⚠️ Pedido {} no sincronizado: {}", outcome.completed.order_id, e);
        }

        self.publish(StoreEvent::StopCompleted {
            route_id,
            stop_id,
            progress: outcome.progress,
        });
        if outcome.route_completed {
            self.publish(StoreEvent::RouteCompleted { route_id });
        }
        Ok(outcome)
    }

    /// Pedidos de las paradas restantes, para pedir una nueva propuesta
    pub fn remaining_orders(&self, route_id: RouteId) -> Result<Vec<Order>, DeliveryError> {
        let route = self.route(route_id)?;
        if route.is_terminal() {
            return Err(DeliveryError::InvalidTransition(format!(
                "route '{}' is already fully delivered",
                route_id
            )));
        }
        route
            .remaining_stops()
            .map(|stop| self.orders.get(stop.order_id).cloned())
            .collect()
    }

    /// Aplicar una propuesta del optimizador a las paradas restantes.
    ///
    /// Si la ruta avanzó desde la instantánea, la secuencia deja de cubrir
    /// exactamente las paradas restantes y se rechaza sin cambios.
    pub fn resequence_with_proposal(
        &mut self,
        route_id: RouteId,
        proposal: OptimizationProposal,
    ) -> Result<Route, DeliveryError> {
        let sequence = stop_sequence_for_orders(self.route(route_id)?, &proposal.sequence)?;
        self.resequence(route_id, &sequence)?;

        let route = self.route_mut(route_id)?;
        route.apply_stop_durations(&proposal.stop_minutes);
        Ok(route.clone())
    }

    pub fn resequence(&mut self, route_id: RouteId, sequence: &[StopId]) -> Result<Route, DeliveryError> {
        let route = self.route_mut(route_id)?;
        resequence_remaining(route, sequence)?;
        let snapshot = route.clone();
        self.publish(StoreEvent::RouteResequenced { route_id });
        Ok(snapshot)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<RwLock<DeliveryStore>>,
    pub events: broadcast::Sender<StoreEvent>,
    pub transcriber: Arc<dyn TranscriptionService>,
    pub optimizer: Arc<dyn RouteOptimizer>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        transcriber: Arc<dyn TranscriptionService>,
        optimizer: Arc<dyn RouteOptimizer>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let store = DeliveryStore::new(events.clone());
        Self {
            config,
            store: Arc::new(RwLock::new(store)),
            events,
            transcriber,
            optimizer,
        }
    }

    /// Estado con los colaboradores elegidos según la configuración
    pub fn from_config(config: EnvironmentConfig) -> anyhow::Result<Self> {
        let transcriber = Arc::new(
            MockTranscriptionService::new(config.transcription_latency())
                .with_jitter(config.transcription_jitter_ms),
        );

        let optimizer: Arc<dyn RouteOptimizer> = match &config.optimizer_url {
            Some(url) => {
                log::info!("🌐 Usando optimizador HTTP en {}", url);
                Arc::new(HttpRouteOptimizer::new(url.clone(), config.collaborator_timeout())?)
            }
            None => Arc::new(MockRouteOptimizer::new(config.optimizer_latency())),
        };

        Ok(Self::new(config, transcriber, optimizer))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
