//! Order document endpoints for the shop UI

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{ApiState, ErrorBody};
use crate::order::OrderRecord;

/// Order history response
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderRecord>,
    pub count: usize,
}

/// Latest order, as written to the snapshot document
async fn order_summary(State(state): State<Arc<ApiState>>) -> Response {
    match state.tools.store().latest().await {
        Ok(Some(order)) => Json(order).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(ErrorBody::new("No order found"))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read order summary");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::with_details("Failed to read order", e.to_string())),
            )
                .into_response()
        }
    }
}

/// Every recorded order
async fn list_orders(State(state): State<Arc<ApiState>>) -> Response {
    match state.tools.store().history().await {
        Ok(orders) => Json(OrdersResponse {
            count: orders.len(),
            orders,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read order history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::with_details("Failed to read orders", e.to_string())),
            )
                .into_response()
        }
    }
}

/// Build order document router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/order-summary", get(order_summary))
        .route("/orders", get(list_orders))
        .with_state(state)
}
