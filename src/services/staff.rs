use crate::{
    db::DbPool,
    entities::job_application::{
        self, ApplicationStatus, Entity as ApplicationEntity, Model as ApplicationModel,
    },
    entities::job_posting::{
        self, Entity as PostingEntity, JobPostingStatus, Model as PostingModel, SalaryType,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobPostingRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Department must be between 1 and 100 characters"))]
    pub department: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub salary_type: SalaryType,
    #[serde(default)]
    pub ai_generated: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobApplicationRequest {
    pub job_posting_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Applicant name must be between 1 and 255 characters"))]
    pub applicant_name: String,
    #[validate(email(message = "Invalid applicant email"))]
    pub applicant_email: String,
    #[validate(length(min = 5, max = 32, message = "Phone must be between 5 and 32 characters"))]
    pub applicant_phone: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobPostingResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    pub requirements: Vec<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub salary_type: SalaryType,
    pub status: JobPostingStatus,
    pub applications_count: i32,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobApplicationResponse {
    pub id: Uuid,
    pub job_posting_id: Uuid,
    pub restaurant_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: String,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobPostingListResponse {
    pub postings: Vec<JobPostingResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn requirements_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn posting_to_response(model: PostingModel) -> JobPostingResponse {
    JobPostingResponse {
        id: model.id,
        restaurant_id: model.restaurant_id,
        title: model.title,
        description: model.description,
        department: model.department,
        requirements: requirements_list(&model.requirements),
        salary_min: model.salary_min,
        salary_max: model.salary_max,
        salary_type: model.salary_type,
        status: model.status,
        applications_count: model.applications_count,
        ai_generated: model.ai_generated,
        created_at: model.created_at,
    }
}

fn application_to_response(model: ApplicationModel) -> JobApplicationResponse {
    JobApplicationResponse {
        id: model.id,
        job_posting_id: model.job_posting_id,
        restaurant_id: model.restaurant_id,
        applicant_name: model.applicant_name,
        applicant_email: model.applicant_email,
        applicant_phone: model.applicant_phone,
        status: model.status,
        notes: model.notes,
        applied_at: model.applied_at,
    }
}

/// Hiring workflow: job postings and the applications against them.
#[derive(Clone)]
pub struct StaffService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl StaffService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_job_posting(
        &self,
        request: CreateJobPostingRequest,
    ) -> Result<JobPostingResponse, ServiceError> {
        request.validate()?;
        if request.salary_min < Decimal::ZERO || request.salary_max < request.salary_min {
            return Err(ServiceError::ValidationError(
                "Salary range must be non-negative with max >= min".into(),
            ));
        }

        let db = &*self.db_pool;
        let posting = job_posting::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(request.restaurant_id),
            title: Set(request.title),
            description: Set(request.description),
            department: Set(request.department),
            requirements: Set(serde_json::json!(request.requirements)),
            salary_min: Set(request.salary_min),
            salary_max: Set(request.salary_max),
            salary_type: Set(request.salary_type),
            status: Set(JobPostingStatus::Active),
            applications_count: Set(0),
            ai_generated: Set(request.ai_generated),
            created_at: Set(Utc::now()),
        };
        let model = posting.insert(db).await.map_err(ServiceError::from)?;
        info!(posting_id = %model.id, title = %model.title, "Job posting created");
        Ok(posting_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn get_job_posting(&self, id: Uuid) -> Result<JobPostingResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = PostingEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Job posting {} not found", id)))?;
        Ok(posting_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn list_job_postings(
        &self,
        restaurant_id: Uuid,
        status: Option<JobPostingStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<JobPostingListResponse, ServiceError> {
        let db = &*self.db_pool;
        let mut query = PostingEntity::find()
            .filter(job_posting::Column::RestaurantId.eq(restaurant_id));
        if let Some(status) = status {
            query = query.filter(job_posting::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(job_posting::Column::CreatedAt)
            .paginate(db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::from)?;
        let postings = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::from)?;

        Ok(JobPostingListResponse {
            postings: postings.into_iter().map(posting_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn update_posting_status(
        &self,
        id: Uuid,
        status: JobPostingStatus,
    ) -> Result<JobPostingResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = PostingEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Job posting {} not found", id)))?;

        let mut active: job_posting::ActiveModel = model.into();
        active.status = Set(status);
        let updated = active.update(db).await.map_err(ServiceError::from)?;
        Ok(posting_to_response(updated))
    }

    /// Records an application and bumps the posting counter in the same
    /// transaction. Closed or paused postings do not accept applications.
    #[instrument(skip(self, request), fields(job_posting_id = %request.job_posting_id))]
    pub async fn create_application(
        &self,
        request: CreateJobApplicationRequest,
    ) -> Result<JobApplicationResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;

        let posting = PostingEntity::find_by_id(request.job_posting_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Job posting {} not found",
                    request.job_posting_id
                ))
            })?;
        if posting.status != JobPostingStatus::Active {
            return Err(ServiceError::InvalidOperation(
                "Job posting is not accepting applications".into(),
            ));
        }

        let txn = db.begin().await.map_err(ServiceError::from)?;

        let application = job_application::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_posting_id: Set(posting.id),
            restaurant_id: Set(posting.restaurant_id),
            applicant_name: Set(request.applicant_name),
            applicant_email: Set(request.applicant_email),
            applicant_phone: Set(request.applicant_phone),
            status: Set(ApplicationStatus::Applied),
            notes: Set(request.notes),
            applied_at: Set(Utc::now()),
        };
        let model = application.insert(&txn).await.map_err(ServiceError::from)?;

        let mut posting_active: job_posting::ActiveModel = posting.clone().into();
        posting_active.applications_count = Set(posting.applications_count + 1);
        posting_active.update(&txn).await.map_err(ServiceError::from)?;

        txn.commit().await.map_err(ServiceError::from)?;

        info!(application_id = %model.id, posting_id = %posting.id, "Job application received");
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::JobApplicationReceived {
                    application_id: model.id,
                    job_posting_id: posting.id,
                    restaurant_id: posting.restaurant_id,
                })
                .await
            {
                warn!(error = %e, application_id = %model.id, "Failed to send application event");
            }
        }

        Ok(application_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn list_applications(
        &self,
        job_posting_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<JobApplicationResponse>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = ApplicationEntity::find()
            .filter(job_application::Column::JobPostingId.eq(job_posting_id));
        if let Some(status) = status {
            query = query.filter(job_application::Column::Status.eq(status));
        }
        let applications = query
            .order_by_desc(job_application::Column::AppliedAt)
            .all(db)
            .await
            .map_err(ServiceError::from)?;
        Ok(applications.into_iter().map(application_to_response).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn update_application_status(
        &self,
        id: Uuid,
        request: UpdateApplicationStatusRequest,
    ) -> Result<JobApplicationResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = ApplicationEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Application {} not found", id)))?;

        let mut active: job_application::ActiveModel = model.into();
        active.status = Set(request.status);
        if let Some(notes) = request.notes {
            active.notes = Set(notes);
        }
        let updated = active.update(db).await.map_err(ServiceError::from)?;
        Ok(application_to_response(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::DatabaseConnection;

    fn service() -> StaffService {
        StaffService::new(Arc::new(DatabaseConnection::Disconnected), None)
    }

    #[tokio::test]
    async fn posting_rejects_inverted_salary_range() {
        let request = CreateJobPostingRequest {
            restaurant_id: Uuid::new_v4(),
            title: "Line cook".into(),
            description: "Evening shift line cook".into(),
            department: "kitchen".into(),
            requirements: vec!["2 years experience".into()],
            salary_min: dec!(2000),
            salary_max: dec!(1500),
            salary_type: SalaryType::Monthly,
            ai_generated: false,
        };
        let result = service().create_job_posting(request).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn application_rejects_bad_email() {
        let request = CreateJobApplicationRequest {
            job_posting_id: Uuid::new_v4(),
            applicant_name: "Jordan".into(),
            applicant_email: "nope".into(),
            applicant_phone: "+34600111222".into(),
            notes: String::new(),
        };
        let result = service().create_application(request).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
