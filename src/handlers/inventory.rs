use super::common::{created_response, no_content_response, success_response, validate_input};
use crate::errors::ServiceError;
use crate::services::forecasting::ForecastDemandRequest;
use crate::services::inventory::{
    CreateInventoryItemRequest, RestockRequest, UpdateInventoryItemRequest,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct InventoryFilters {
    pub restaurant_id: Uuid,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RestaurantQuery {
    pub restaurant_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventoryFilters),
    responses(
        (status = 200, description = "Inventory list returned",
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(filters): Query<InventoryFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state
        .services
        .inventory
        .list_items(filters.restaurant_id, filters.category)
        .await?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    params(RestaurantQuery),
    responses(
        (status = 200, description = "Items at or below their minimum threshold"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn low_stock_items(
    State(state): State<AppState>,
    Query(filters): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state
        .services
        .inventory
        .low_stock_items(filters.restaurant_id)
        .await?;
    Ok(success_response(items))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 201, description = "Inventory item created",
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let item = state.services.inventory.create_item(request).await?;
    Ok(created_response(item))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let item = state.services.inventory.update_item(id, request).await?;
    Ok(success_response(item))
}

async fn deactivate_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.inventory.deactivate_item(id).await?;
    Ok(no_content_response())
}

async fn restock_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RestockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let item = state.services.inventory.restock(id, request).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/forecast",
    request_body = ForecastDemandRequest,
    responses(
        (status = 200, description = "Forecast computed and persisted"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn forecast_item_demand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ForecastDemandRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let forecast = state
        .services
        .forecasting
        .forecast_demand(id, request)
        .await?;
    Ok(success_response(forecast))
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/", get(list_inventory))
        .route("/low-stock", get(low_stock_items))
        .route("/:id", get(get_item))
        .route("/:id", put(update_item))
        .route("/:id", delete(deactivate_item))
        .route("/:id/restock", post(restock_item))
        .route("/:id/forecast", post(forecast_item_demand))
}
