use uuid::Uuid;

use crate::clients::{call_with_timeout, navigation};
use crate::dto::route_dto::{NavigationResponse, RouteResponse};
use crate::dto::ApiResponse;
use crate::models::route::{RouteId, RouteProgress, Stop, StopId};
use crate::services::delivery_progress_service::DeliveryOutcome;
use crate::state::AppState;
use crate::utils::errors::{AppError, DeliveryError};

pub struct RouteController {
    state: AppState,
}

impl RouteController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Planificar una ruta con todos los pedidos confirmados.
    ///
    /// El optimizador trabaja sobre una instantánea; la propuesta se aplica
    /// después bajo el lock de escritura y el store la revalida.
    pub async fn plan(&self) -> Result<ApiResponse<RouteResponse>, AppError> {
        let confirmed = self.state.store.read().await.confirmed_orders();
        if confirmed.is_empty() {
            return Err(DeliveryError::EmptyInput(
                "a route cannot be built from zero confirmed orders".to_string(),
            )
            .into());
        }

        let proposal = call_with_timeout(
            "route optimizer",
            self.state.config.collaborator_timeout(),
            self.state.optimizer.propose(&confirmed),
        )
        .await?;

        let route = self.state.store.write().await.plan_route(Some(proposal))?;

        Ok(ApiResponse::with_message(
            route.into(),
            "Route optimized successfully".to_string(),
        ))
    }

    pub async fn list(&self) -> Vec<RouteResponse> {
        let store = self.state.store.read().await;
        store.routes().iter().cloned().map(RouteResponse::from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RouteResponse, AppError> {
        let store = self.state.store.read().await;
        Ok(store.route(RouteId(id))?.clone().into())
    }

    pub async fn progress(&self, id: Uuid) -> Result<RouteProgress, AppError> {
        Ok(self.state.store.read().await.progress(RouteId(id))?)
    }

    pub async fn current_stop(&self, id: Uuid) -> Result<Option<Stop>, AppError> {
        let store = self.state.store.read().await;
        Ok(store.route(RouteId(id))?.current_stop().cloned())
    }

    pub async fn mark_delivered(&self, id: Uuid, stop_id: Uuid) -> Result<ApiResponse<DeliveryOutcome>, AppError> {
        let outcome = self
            .state
            .store
            .write()
            .await
            .mark_delivered(RouteId(id), StopId(stop_id))?;

        let message = if outcome.route_completed {
            "Route completed"
        } else {
            "Delivery completed, moving to the next stop"
        };
        Ok(ApiResponse::with_message(outcome, message.to_string()))
    }

    /// Reordenar las paradas restantes.
    ///
    /// Con `sequence` se aplica el orden del cliente. Sin ella se pide una
    /// propuesta al optimizador sobre una instantánea de las paradas
    /// restantes, igual que en `plan`.
    pub async fn resequence(&self, id: Uuid, sequence: Option<Vec<Uuid>>) -> Result<ApiResponse<RouteResponse>, AppError> {
        let route_id = RouteId(id);
        let route = match sequence {
            Some(sequence) => {
                let sequence: Vec<StopId> = sequence.into_iter().map(StopId).collect();
                self.state.store.write().await.resequence(route_id, &sequence)?
            }
            None => {
                let remaining = self.state.store.read().await.remaining_orders(route_id)?;

                let proposal = call_with_timeout(
                    "route optimizer",
                    self.state.config.collaborator_timeout(),
                    self.state.optimizer.propose(&remaining),
                )
                .await?;

                self.state
                    .store
                    .write()
                    .await
                    .resequence_with_proposal(route_id, proposal)?
            }
        };

        Ok(ApiResponse::with_message(
            route.into(),
            "Remaining stops re-sequenced".to_string(),
        ))
    }

    pub async fn navigation(&self, id: Uuid) -> Result<NavigationResponse, AppError> {
        let store = self.state.store.read().await;
        let route = store.route(RouteId(id))?;
        Ok(NavigationResponse {
            route_id: id,
            links: navigation::links_for_route(route),
        })
    }
}
