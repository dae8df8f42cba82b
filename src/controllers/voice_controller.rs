use crate::clients::call_with_timeout;
use crate::dto::order_dto::TranscribeRequest;
use crate::dto::ApiResponse;
use crate::models::order::Order;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct VoiceController {
    state: AppState,
}

impl VoiceController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Transcribir la llamada y registrar el pedido resultante.
    ///
    /// La transcripción ocurre sin tocar el store; solo el intake final toma
    /// el lock de escritura.
    pub async fn transcribe(&self, request: TranscribeRequest) -> Result<ApiResponse<Order>, AppError> {
        let input = request.into_voice_input()?;

        let draft = call_with_timeout(
            "transcription service",
            self.state.config.collaborator_timeout(),
            self.state.transcriber.transcribe(input),
        )
        .await?;

        let order = self.state.store.write().await.intake(draft)?;
        log::info!("🎙️ Pedido {} creado desde llamada de voz", order.id);

        Ok(ApiResponse::with_message(
            order,
            "New delivery order has been created from the call".to_string(),
        ))
    }
}
