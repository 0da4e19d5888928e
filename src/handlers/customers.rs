use super::common::{created_response, success_response, validate_input, PaginationParams};
use crate::entities::customer::CustomerStatus;
use crate::errors::ServiceError;
use crate::services::customers::{CreateCustomerRequest, UpdateCustomerRequest};
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
pub struct CustomerFilters {
    pub restaurant_id: Uuid,
    pub status: Option<CustomerStatus>,
}

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let customer = state.services.customers.create_customer(request).await?;
    Ok(created_response(customer))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.services.customers.get_customer(id).await?;
    Ok(success_response(customer))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(filters): Query<CustomerFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(&state.config.pagination);
    let customers = state
        .services
        .customers
        .list_customers(filters.restaurant_id, filters.status, page, per_page)
        .await?;
    Ok(success_response(customers))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let customer = state.services.customers.update_customer(id, request).await?;
    Ok(success_response(customer))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/", get(list_customers))
        .route("/:id", get(get_customer))
        .route("/:id", put(update_customer))
}
