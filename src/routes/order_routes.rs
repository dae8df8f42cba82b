use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::order_controller::OrderController;
use crate::dto::ApiResponse;
use crate::models::order::{Order, OrderDraft, OrderStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/stats", get(order_stats))
        .route("/:id", get(get_order).delete(reject_order))
        .route("/:id/confirm", post(confirm_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), AppError> {
    let controller = OrderController::new(state);
    let response = controller.create(draft).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    let controller = OrderController::new(state);
    Json(controller.list().await)
}

async fn order_stats(State(state): State<AppState>) -> Json<OrderStats> {
    let controller = OrderController::new(state);
    Json(controller.stats().await)
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let controller = OrderController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn confirm_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let controller = OrderController::new(state);
    let response = controller.confirm(id).await?;
    Ok(Json(response))
}

async fn reject_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = OrderController::new(state);
    let response = controller.reject(id).await?;
    Ok(Json(response))
}
