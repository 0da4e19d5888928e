use super::common::success_response;
use crate::errors::ServiceError;
use crate::services::analytics::GenerateReportRequest;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/{restaurant_id}",
    responses(
        (status = 200, description = "Dashboard rollup for the restaurant"),
        (status = 404, description = "Restaurant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn dashboard_metrics(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let metrics = state.services.dashboard.dashboard_metrics(restaurant_id).await?;
    Ok(success_response(metrics))
}

async fn analytics_totals(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let totals = state.services.analytics.totals(restaurant_id).await?;
    Ok(success_response(totals))
}

async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state.services.analytics.generate_report(request).await?;
    Ok(success_response(report))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/:restaurant_id", get(dashboard_metrics))
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/:restaurant_id/totals", get(analytics_totals))
        .route("/reports", post(generate_report))
}
