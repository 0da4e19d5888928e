use super::common::{created_response, success_response, validate_input};
use crate::errors::ServiceError;
use crate::services::suppliers::CreateSupplierRequest;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SupplierFilters {
    pub restaurant_id: Uuid,
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let supplier = state.services.suppliers.create_supplier(request).await?;
    Ok(created_response(supplier))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.suppliers.get_supplier(id).await?;
    Ok(success_response(supplier))
}

async fn list_suppliers(
    State(state): State<AppState>,
    Query(filters): Query<SupplierFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state
        .services
        .suppliers
        .list_suppliers(filters.restaurant_id)
        .await?;
    Ok(success_response(suppliers))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier))
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
}
