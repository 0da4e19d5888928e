use crate::{
    db::DbPool,
    entities::marketing_campaign::{
        self, CampaignStatus, CampaignType, Entity as CampaignEntity, Model as CampaignModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Campaign copy produced for a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignContent {
    pub title: String,
    pub message: String,
    pub cta_text: String,
}

/// Produces campaign copy from a prompt. The default implementation is a
/// deterministic template; an LLM-backed strategy can be swapped in without
/// touching the service.
pub trait ContentGenerationStrategy: Send + Sync {
    fn generate(&self, restaurant_name: &str, campaign_type: CampaignType, prompt: &str)
        -> CampaignContent;
}

/// Template-based generator. Output depends only on its inputs.
pub struct TemplateContentGenerator;

impl ContentGenerationStrategy for TemplateContentGenerator {
    fn generate(
        &self,
        restaurant_name: &str,
        campaign_type: CampaignType,
        prompt: &str,
    ) -> CampaignContent {
        let channel = match campaign_type {
            CampaignType::Whatsapp => "WhatsApp",
            CampaignType::Email => "email",
            CampaignType::Social => "social media",
        };
        CampaignContent {
            title: format!("{}: {}", restaurant_name, prompt),
            message: format!(
                "Hi! {} has something for you: {}. Reply to this {} message to claim it.",
                restaurant_name, prompt, channel
            ),
            cta_text: "Order now".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCampaignRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    pub campaign_type: CampaignType,
    #[validate(length(min = 1, max = 255, message = "Target audience must be between 1 and 255 characters"))]
    pub target_audience: String,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub content_title: String,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub content_message: String,
    pub cta_text: Option<String>,
    pub schedule_start: Option<DateTime<Utc>>,
    pub schedule_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateCampaignRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Restaurant name must be between 1 and 255 characters"))]
    pub restaurant_name: String,
    pub campaign_type: CampaignType,
    #[validate(length(min = 1, max = 1024, message = "Prompt must be between 1 and 1024 characters"))]
    pub prompt: String,
    #[validate(length(min = 1, max = 255, message = "Target audience must be between 1 and 255 characters"))]
    pub target_audience: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignMetrics {
    pub sent: i32,
    pub delivered: i32,
    pub opened: i32,
    pub clicked: i32,
    pub conversions: i32,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub target_audience: String,
    pub content_title: String,
    pub content_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    pub ai_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
    pub schedule_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_end: Option<DateTime<Utc>>,
    pub metrics: CampaignMetrics,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn model_to_response(model: CampaignModel) -> CampaignResponse {
    CampaignResponse {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        campaign_type: model.campaign_type,
        status: model.status,
        target_audience: model.target_audience,
        content_title: model.content_title,
        content_message: model.content_message,
        cta_text: model.cta_text,
        ai_generated: model.ai_generated,
        ai_prompt: model.ai_prompt,
        schedule_start: model.schedule_start,
        schedule_end: model.schedule_end,
        metrics: CampaignMetrics {
            sent: model.metric_sent,
            delivered: model.metric_delivered,
            opened: model.metric_opened,
            clicked: model.metric_clicked,
            conversions: model.metric_conversions,
            revenue: model.metric_revenue,
        },
        created_at: model.created_at,
    }
}

#[derive(Clone)]
pub struct MarketingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    generator: Arc<dyn ContentGenerationStrategy>,
}

impl MarketingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
            generator: Arc::new(TemplateContentGenerator),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerationStrategy>) -> Self {
        self.generator = generator;
        self
    }

    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_campaign(
        &self,
        request: CreateCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError> {
        request.validate()?;
        if let (Some(start), Some(end)) = (request.schedule_start, request.schedule_end) {
            if end <= start {
                return Err(ServiceError::ValidationError(
                    "Schedule end must be after schedule start".into(),
                ));
            }
        }

        let now = Utc::now();
        self.insert_campaign(marketing_campaign::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name),
            campaign_type: Set(request.campaign_type),
            status: Set(CampaignStatus::Draft),
            target_audience: Set(request.target_audience),
            content_title: Set(request.content_title),
            content_message: Set(request.content_message),
            cta_text: Set(request.cta_text),
            ai_generated: Set(false),
            ai_prompt: Set(None),
            schedule_start: Set(request.schedule_start.unwrap_or(now)),
            schedule_end: Set(request.schedule_end),
            metric_sent: Set(0),
            metric_delivered: Set(0),
            metric_opened: Set(0),
            metric_clicked: Set(0),
            metric_conversions: Set(0),
            metric_revenue: Set(Decimal::ZERO),
            created_at: Set(now),
        })
        .await
    }

    /// Builds campaign copy from the configured strategy and stores the
    /// result as an ai_generated campaign with the prompt kept for audit.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn generate_campaign(
        &self,
        request: GenerateCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError> {
        request.validate()?;
        let content = self.generator.generate(
            &request.restaurant_name,
            request.campaign_type,
            &request.prompt,
        );

        let now = Utc::now();
        self.insert_campaign(marketing_campaign::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(request.restaurant_id),
            name: Set(content.title.clone()),
            campaign_type: Set(request.campaign_type),
            status: Set(CampaignStatus::AiGenerated),
            target_audience: Set(request.target_audience),
            content_title: Set(content.title),
            content_message: Set(content.message),
            cta_text: Set(Some(content.cta_text)),
            ai_generated: Set(true),
            ai_prompt: Set(Some(request.prompt)),
            schedule_start: Set(now),
            schedule_end: Set(Some(now + Duration::days(7))),
            metric_sent: Set(0),
            metric_delivered: Set(0),
            metric_opened: Set(0),
            metric_clicked: Set(0),
            metric_conversions: Set(0),
            metric_revenue: Set(Decimal::ZERO),
            created_at: Set(now),
        })
        .await
    }

    async fn insert_campaign(
        &self,
        campaign: marketing_campaign::ActiveModel,
    ) -> Result<CampaignResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = campaign.insert(db).await.map_err(ServiceError::from)?;

        info!(campaign_id = %model.id, name = %model.name, "Campaign created");
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::CampaignCreated {
                    campaign_id: model.id,
                    restaurant_id: model.restaurant_id,
                })
                .await
            {
                warn!(error = %e, campaign_id = %model.id, "Failed to send campaign created event");
            }
        }

        Ok(model_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn get_campaign(&self, id: Uuid) -> Result<CampaignResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = CampaignEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Campaign {} not found", id)))?;
        Ok(model_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn list_campaigns(
        &self,
        restaurant_id: Uuid,
        status: Option<CampaignStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<CampaignListResponse, ServiceError> {
        let db = &*self.db_pool;
        let mut query = CampaignEntity::find()
            .filter(marketing_campaign::Column::RestaurantId.eq(restaurant_id));
        if let Some(status) = status {
            query = query.filter(marketing_campaign::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(marketing_campaign::Column::CreatedAt)
            .paginate(db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::from)?;
        let campaigns = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::from)?;

        Ok(CampaignListResponse {
            campaigns: campaigns.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn update_campaign_status(
        &self,
        id: Uuid,
        status: CampaignStatus,
    ) -> Result<CampaignResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = CampaignEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Campaign {} not found", id)))?;

        let mut active: marketing_campaign::ActiveModel = model.into();
        active.status = Set(status);
        let updated = active.update(db).await.map_err(ServiceError::from)?;
        Ok(model_to_response(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    #[test]
    fn template_generator_is_deterministic() {
        let generator = TemplateContentGenerator;
        let a = generator.generate("La Plaza", CampaignType::Whatsapp, "2x1 on tapas this Friday");
        let b = generator.generate("La Plaza", CampaignType::Whatsapp, "2x1 on tapas this Friday");
        assert_eq!(a, b);
        assert!(a.title.contains("La Plaza"));
        assert!(a.message.contains("2x1 on tapas this Friday"));
        assert!(a.message.contains("WhatsApp"));
    }

    #[tokio::test]
    async fn create_rejects_inverted_schedule() {
        let service =
            MarketingService::new(Arc::new(DatabaseConnection::Disconnected), None);
        let now = Utc::now();
        let request = CreateCampaignRequest {
            restaurant_id: Uuid::new_v4(),
            name: "Weekend promo".into(),
            campaign_type: CampaignType::Email,
            target_audience: "regulars".into(),
            content_title: "Weekend promo".into(),
            content_message: "Free dessert with any main".into(),
            cta_text: None,
            schedule_start: Some(now),
            schedule_end: Some(now - Duration::days(1)),
        };
        let result = service.create_campaign(request).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
