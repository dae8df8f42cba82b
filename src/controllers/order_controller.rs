use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::models::order::{Order, OrderDraft, OrderId, OrderStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct OrderController {
    state: AppState,
}

impl OrderController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn create(&self, draft: OrderDraft) -> Result<ApiResponse<Order>, AppError> {
        let order = self.state.store.write().await.intake(draft)?;
        Ok(ApiResponse::with_message(
            order,
            "Order created and waiting for confirmation".to_string(),
        ))
    }

    pub async fn list(&self) -> Vec<Order> {
        self.state.store.read().await.orders().to_vec()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Order, AppError> {
        let store = self.state.store.read().await;
        Ok(store.order(OrderId(id))?.clone())
    }

    pub async fn stats(&self) -> OrderStats {
        self.state.store.read().await.order_stats()
    }

    pub async fn confirm(&self, id: Uuid) -> Result<ApiResponse<Order>, AppError> {
        let order = self.state.store.write().await.confirm_order(OrderId(id))?;
        Ok(ApiResponse::with_message(
            order,
            "The delivery order has been confirmed and is ready for route planning".to_string(),
        ))
    }

    pub async fn reject(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.state.store.write().await.reject_order(OrderId(id))?;
        Ok(ApiResponse::message(
            "The delivery order has been removed from the system".to_string(),
        ))
    }
}
