use super::common::{success_response, PaginationParams};
use crate::entities::purchase_order::PurchaseOrderStatus;
use crate::errors::ServiceError;
use crate::services::purchase_orders::UpdatePurchaseOrderStatusRequest;
use crate::services::replenishment::GeneratePurchaseOrderRequest;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PurchaseOrderFilters {
    pub restaurant_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: Option<PurchaseOrderStatus>,
}

/// Runs the replenishment planner for one (restaurant, supplier) pair.
/// A run that finds nothing to order returns 200 with success=false; a
/// concurrent run for the same pair returns 409.
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/generate",
    request_body = GeneratePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order generated"),
        (status = 200, description = "No items need reordering"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Replenishment already in progress", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn generate_purchase_order(
    State(state): State<AppState>,
    Json(request): Json<GeneratePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state
        .services
        .replenishment
        .generate_purchase_order(request)
        .await?;
    let status = if outcome.success {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let po = state.services.purchase_orders.get_purchase_order(id).await?;
    Ok(success_response(po))
}

async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(filters): Query<PurchaseOrderFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(&state.config.pagination);
    let list = state
        .services
        .purchase_orders
        .list_purchase_orders(
            filters.restaurant_id,
            filters.supplier_id,
            filters.status,
            page,
            per_page,
        )
        .await?;
    Ok(success_response(list))
}

#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}/status",
    request_body = UpdatePurchaseOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Transition not permitted", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePurchaseOrderStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let po = state
        .services
        .purchase_orders
        .update_status(id, request.status)
        .await?;
    Ok(success_response(po))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/status", put(update_purchase_order_status))
}
