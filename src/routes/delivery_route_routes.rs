use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{NavigationResponse, ResequenceRequest, RouteResponse};
use crate::dto::ApiResponse;
use crate::models::route::{RouteProgress, Stop};
use crate::services::delivery_progress_service::DeliveryOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_delivery_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(plan_route).get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id/progress", get(route_progress))
        .route("/:id/current", get(current_stop))
        .route("/:id/stops/:stop_id/delivered", post(mark_delivered))
        .route("/:id/resequence", post(resequence_route))
        .route("/:id/navigation", get(route_navigation))
}

async fn plan_route(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<RouteResponse>>), AppError> {
    let controller = RouteController::new(state);
    let response = controller.plan().await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteResponse>> {
    let controller = RouteController::new(state);
    Json(controller.list().await)
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn route_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteProgress>, AppError> {
    let controller = RouteController::new(state);
    Ok(Json(controller.progress(id).await?))
}

async fn current_stop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Stop>>, AppError> {
    let controller = RouteController::new(state);
    Ok(Json(controller.current_stop(id).await?))
}

async fn mark_delivered(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<DeliveryOutcome>>, AppError> {
    let controller = RouteController::new(state);
    Ok(Json(controller.mark_delivered(id, stop_id).await?))
}

async fn resequence_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Option<Json<ResequenceRequest>>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state);
    let Json(request) = request.unwrap_or_default();
    Ok(Json(controller.resequence(id, request.sequence).await?))
}

async fn route_navigation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NavigationResponse>, AppError> {
    let controller = RouteController::new(state);
    Ok(Json(controller.navigation(id).await?))
}
