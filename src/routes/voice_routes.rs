use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::controllers::voice_controller::VoiceController;
use crate::dto::order_dto::TranscribeRequest;
use crate::dto::ApiResponse;
use crate::models::order::Order;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_voice_router() -> Router<AppState> {
    Router::new().route("/transcribe", post(transcribe))
}

async fn transcribe(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), AppError> {
    let controller = VoiceController::new(state);
    let response = controller.transcribe(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
