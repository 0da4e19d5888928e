use super::common::{created_response, success_response, validate_input, PaginationParams};
use crate::entities::job_application::ApplicationStatus;
use crate::entities::job_posting::JobPostingStatus;
use crate::errors::ServiceError;
use crate::services::staff::{
    CreateJobApplicationRequest, CreateJobPostingRequest, UpdateApplicationStatusRequest,
};
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
pub struct PostingFilters {
    pub restaurant_id: Uuid,
    pub status: Option<JobPostingStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostingStatusRequest {
    pub status: JobPostingStatus,
}

async fn create_posting(
    State(state): State<AppState>,
    Json(request): Json<CreateJobPostingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let posting = state.services.staff.create_job_posting(request).await?;
    Ok(created_response(posting))
}

async fn get_posting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let posting = state.services.staff.get_job_posting(id).await?;
    Ok(success_response(posting))
}

async fn list_postings(
    State(state): State<AppState>,
    Query(filters): Query<PostingFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(&state.config.pagination);
    let postings = state
        .services
        .staff
        .list_job_postings(filters.restaurant_id, filters.status, page, per_page)
        .await?;
    Ok(success_response(postings))
}

async fn update_posting_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostingStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let posting = state
        .services
        .staff
        .update_posting_status(id, request.status)
        .await?;
    Ok(success_response(posting))
}

async fn create_application(
    State(state): State<AppState>,
    Json(request): Json<CreateJobApplicationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&request)?;
    let application = state.services.staff.create_application(request).await?;
    Ok(created_response(application))
}

async fn list_applications(
    State(state): State<AppState>,
    Path(posting_id): Path<Uuid>,
    Query(filters): Query<ApplicationFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let applications = state
        .services
        .staff
        .list_applications(posting_id, filters.status)
        .await?;
    Ok(success_response(applications))
}

async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let application = state
        .services
        .staff
        .update_application_status(id, request)
        .await?;
    Ok(success_response(application))
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/postings", post(create_posting))
        .route("/postings", get(list_postings))
        .route("/postings/:id", get(get_posting))
        .route("/postings/:id/status", put(update_posting_status))
        .route("/postings/:id/applications", get(list_applications))
        .route("/applications", post(create_application))
        .route("/applications/:id/status", put(update_application_status))
}
