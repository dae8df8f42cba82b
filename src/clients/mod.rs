//! Clients - colaboradores externos
//!
//! Servicios de transcripción, optimización de rutas y navegación. Las
//! llamadas asíncronas pasan siempre por `call_with_timeout`.

pub mod navigation;
pub mod optimizer;
pub mod transcription;

use std::future::Future;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

pub use optimizer::{HttpRouteOptimizer, MockRouteOptimizer, OptimizationProposal, RouteOptimizer};
pub use transcription::{MockTranscriptionService, TranscriptionService, VoiceInput};

/// Ejecutar una llamada a un colaborador con plazo máximo.
///
/// Un plazo vencido se convierte en `AppError::Timeout` y un error del
/// colaborador en `AppError::ExternalApi`.
pub async fn call_with_timeout<T, F>(label: &str, limit: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            log::error!("❌ {} falló: {}", label, e);
            Err(AppError::ExternalApi(format!("{}: {}", label, e)))
        }
        Err(_) => {
            log::error!("⏱️ {} sin respuesta tras {} ms", label, limit.as_millis());
            Err(AppError::Timeout(format!(
                "{} did not answer within {} ms",
                label,
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let value = call_with_timeout("echo", Duration::from_millis(100), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn collaborator_errors_become_external_api_errors() {
        let result: AppResult<()> = call_with_timeout("broken", Duration::from_millis(100), async {
            Err(anyhow::anyhow!("connection refused"))
        })
        .await;
        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("connection refused")));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let result: AppResult<()> = call_with_timeout("slow", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
