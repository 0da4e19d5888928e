use super::common::{created_response, success_response, validate_input, PaginationParams};
use crate::entities::marketing_campaign::CampaignStatus;
use crate::errors::ServiceError;
use crate::services::marketing::{CreateCampaignRequest, GenerateCampaignRequest};
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
pub struct CampaignFilters {
    pub restaurant_id: Uuid,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCampaignStatusRequest {
    pub status: CampaignStatus,
}

async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let campaign = state.services.marketing.create_campaign(request).await?;
    Ok(created_response(campaign))
}

async fn generate_campaign(
    State(state): State<AppState>,
    Json(request): Json<GenerateCampaignRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let campaign = state.services.marketing.generate_campaign(request).await?;
    Ok(created_response(campaign))
}

async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let campaign = state.services.marketing.get_campaign(id).await?;
    Ok(success_response(campaign))
}

async fn list_campaigns(
    State(state): State<AppState>,
    Query(filters): Query<CampaignFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(&state.config.pagination);
    let campaigns = state
        .services
        .marketing
        .list_campaigns(filters.restaurant_id, filters.status, page, per_page)
        .await?;
    Ok(success_response(campaigns))
}

async fn update_campaign_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCampaignStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let campaign = state
        .services
        .marketing
        .update_campaign_status(id, request.status)
        .await?;
    Ok(success_response(campaign))
}

pub fn marketing_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", post(create_campaign))
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns/generate", post(generate_campaign))
        .route("/campaigns/:id", get(get_campaign))
        .route("/campaigns/:id/status", put(update_campaign_status))
}
