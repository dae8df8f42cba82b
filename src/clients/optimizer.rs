//! Servicio de optimización de rutas
//!
//! El optimizador propone un orden de visita para un conjunto de pedidos
//! confirmados. `MockRouteOptimizer` simula la latencia y devuelve la
//! secuencia por defecto; `HttpRouteOptimizer` delega en un servicio HTTP.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::dto::optimizer_dto::{OptimizerRequest, OptimizerResponse, OptimizerStop};
use crate::models::order::{Order, OrderId};
use crate::models::route::RouteEstimates;
use crate::services::route_sequencing_service::default_sequence;

/// Propuesta del optimizador
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationProposal {
    pub sequence: Vec<OrderId>,
    pub estimates: Option<RouteEstimates>,
    /// Minutos estimados por parada; las ausentes usan la duración por defecto
    pub stop_minutes: HashMap<OrderId, u32>,
}

#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    async fn propose(&self, orders: &[Order]) -> Result<OptimizationProposal>;
}

/// Duraciones por parada que devuelve el mock, en orden de visita
const MOCK_STOP_MINUTES: [u32; 3] = [10, 8, 12];

/// Mock del optimizador con cifras fijas
#[derive(Debug, Clone)]
pub struct MockRouteOptimizer {
    latency: Duration,
}

impl MockRouteOptimizer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl RouteOptimizer for MockRouteOptimizer {
    async fn propose(&self, orders: &[Order]) -> Result<OptimizationProposal> {
        log::info!("🚀 Optimizando {} pedidos (latencia simulada {} ms)", orders.len(), self.latency.as_millis());
        tokio::time::sleep(self.latency).await;

        let sequence = default_sequence(orders);
        let stop_minutes = sequence
            .iter()
            .zip(MOCK_STOP_MINUTES.iter().cycle())
            .map(|(id, minutes)| (*id, *minutes))
            .collect();

        Ok(OptimizationProposal {
            sequence,
            estimates: Some(RouteEstimates {
                total_distance_km: 24.5,
                total_duration_minutes: 135,
                time_saved_minutes: 35,
            }),
            stop_minutes,
        })
    }
}

/// Optimizador remoto vía HTTP
pub struct HttpRouteOptimizer {
    url: String,
    client: Client,
}

impl HttpRouteOptimizer {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl RouteOptimizer for HttpRouteOptimizer {
    async fn propose(&self, orders: &[Order]) -> Result<OptimizationProposal> {
        let request = OptimizerRequest {
            stops: orders.iter().map(OptimizerStop::from).collect(),
        };

        log::info!("📤 Enviando {} paradas a {}", request.stops.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .header("User-Agent", "VoiceDelivery/1.0")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        log::info!("📡 Optimizer response status: {}", status);
        log::debug!("📄 Optimizer response body: {}", response_text);

        if !status.is_success() {
            return Err(anyhow!("Optimizer error {}: {}", status, response_text));
        }

        let parsed: OptimizerResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow!("Error parsing optimizer response: {}", e))?;

        Ok(proposal_from_response(parsed))
    }
}

fn proposal_from_response(response: OptimizerResponse) -> OptimizationProposal {
    let estimates = match (
        response.total_distance_km,
        response.total_duration_minutes,
        response.time_saved_minutes,
    ) {
        (Some(total_distance_km), Some(total_duration_minutes), time_saved) => Some(RouteEstimates {
            total_distance_km,
            total_duration_minutes,
            time_saved_minutes: time_saved.unwrap_or(0),
        }),
        _ => None,
    };

    OptimizationProposal {
        sequence: response.sequence.into_iter().map(OrderId::from).collect(),
        estimates,
        stop_minutes: response
            .stop_minutes
            .into_iter()
            .map(|(id, minutes)| (OrderId::from(id), minutes))
            .collect(),
    }
}
