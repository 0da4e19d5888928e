use super::common::{created_response, success_response, validate_input};
use crate::errors::ServiceError;
use crate::services::restaurants::CreateRestaurantRequest;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

async fn create_restaurant(
    State(state): State<AppState>,
    Json(request): Json<CreateRestaurantRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let restaurant = state.services.restaurants.create_restaurant(request).await?;
    Ok(created_response(restaurant))
}

async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let restaurant = state.services.restaurants.get_restaurant(id).await?;
    Ok(success_response(restaurant))
}

async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let restaurants = state.services.restaurants.list_restaurants().await?;
    Ok(success_response(restaurants))
}

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_restaurant))
        .route("/", get(list_restaurants))
        .route("/:id", get(get_restaurant))
}
