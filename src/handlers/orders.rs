use super::common::{created_response, success_response, validate_input, PaginationParams};
use crate::entities::order::OrderStatus;
use crate::errors::ServiceError;
use crate::services::messaging::InboundMessageRequest;
use crate::services::orders::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderFilters {
    pub restaurant_id: Uuid,
    pub status: Option<OrderStatus>,
}

async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let order = state.services.orders.create_order(request).await?;
    Ok(created_response(order))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.get_order(id).await?;
    Ok(success_response(order))
}

async fn list_orders(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(&state.config.pagination);
    let orders = state
        .services
        .orders
        .list_orders(filters.restaurant_id, filters.status, page, per_page)
        .await?;
    Ok(success_response(orders))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let order = state.services.orders.update_order_status(id, request).await?;
    Ok(success_response(order))
}

/// Inbound message webhook. Always answers 200; the body says whether the
/// message was recognized as an order.
async fn process_inbound_message(
    State(state): State<AppState>,
    Json(request): Json<InboundMessageRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let outcome = state.services.messaging.process_message(request).await?;
    Ok(success_response(outcome))
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/inbound-message", post(process_inbound_message))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_order_status))
}
