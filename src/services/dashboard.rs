use crate::{
    db::DbPool,
    entities::inventory_item::{self, Entity as ItemEntity, InventoryStatus},
    entities::job_application::{self, ApplicationStatus, Entity as ApplicationEntity},
    entities::marketing_campaign::{self, CampaignStatus, Entity as CampaignEntity},
    entities::order::{self, Entity as OrderEntity, OrderStatus},
    entities::restaurant::Entity as RestaurantEntity,
    errors::ServiceError,
    services::stock,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

const RECENT_ORDER_COUNT: u64 = 5;
const LOW_STOCK_ALERT_COUNT: usize = 5;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardOrderSummary {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LowStockAlert {
    pub id: Uuid,
    pub name: String,
    pub current_quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_empty: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetrics {
    pub restaurant_id: Uuid,
    pub todays_orders: u64,
    pub todays_revenue: Decimal,
    pub average_order_value: Decimal,
    pub low_stock_count: u64,
    pub active_campaigns: u64,
    pub pending_applications: u64,
    pub recent_orders: Vec<DashboardOrderSummary>,
    pub low_stock_items: Vec<LowStockAlert>,
    pub generated_at: DateTime<Utc>,
}

/// Read-only rollup across the operational tables for one restaurant.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn dashboard_metrics(
        &self,
        restaurant_id: Uuid,
    ) -> Result<DashboardMetrics, ServiceError> {
        let db = &*self.db_pool;

        RestaurantEntity::find_by_id(restaurant_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Restaurant {} not found", restaurant_id))
            })?;

        let now = Utc::now();
        let start_of_day = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now);

        let todays_orders = OrderEntity::find()
            .filter(order::Column::RestaurantId.eq(restaurant_id))
            .filter(order::Column::CreatedAt.gte(start_of_day))
            .all(db)
            .await
            .map_err(ServiceError::from)?;
        let todays_count = todays_orders.len() as u64;
        let todays_revenue: Decimal = todays_orders.iter().map(|o| o.total_amount).sum();
        let average_order_value = if todays_count > 0 {
            todays_revenue / Decimal::from(todays_count)
        } else {
            Decimal::ZERO
        };

        let low_stock_models = ItemEntity::find()
            .filter(inventory_item::Column::RestaurantId.eq(restaurant_id))
            .filter(inventory_item::Column::IsActive.eq(true))
            .filter(
                inventory_item::Column::Status
                    .is_in([InventoryStatus::LowStock, InventoryStatus::OutOfStock]),
            )
            .order_by_asc(inventory_item::Column::CurrentQuantity)
            .all(db)
            .await
            .map_err(ServiceError::from)?;
        let low_stock_count = low_stock_models.len() as u64;
        let low_stock_items = low_stock_models
            .iter()
            .take(LOW_STOCK_ALERT_COUNT)
            .map(|item| LowStockAlert {
                id: item.id,
                name: item.name.clone(),
                current_quantity: item.current_quantity,
                minimum_threshold: item.minimum_threshold,
                unit: item.unit.clone(),
                days_until_empty: stock::evaluate(item).days_until_empty,
            })
            .collect();

        let active_campaigns = CampaignEntity::find()
            .filter(marketing_campaign::Column::RestaurantId.eq(restaurant_id))
            .filter(marketing_campaign::Column::Status.eq(CampaignStatus::Active))
            .count(db)
            .await
            .map_err(ServiceError::from)?;

        let pending_applications = ApplicationEntity::find()
            .filter(job_application::Column::RestaurantId.eq(restaurant_id))
            .filter(job_application::Column::Status.eq(ApplicationStatus::Applied))
            .count(db)
            .await
            .map_err(ServiceError::from)?;

        let recent_orders = OrderEntity::find()
            .filter(order::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(order::Column::CreatedAt)
            .limit(RECENT_ORDER_COUNT)
            .all(db)
            .await
            .map_err(ServiceError::from)?
            .into_iter()
            .map(|o| DashboardOrderSummary {
                id: o.id,
                order_number: o.order_number,
                customer_name: o.customer_name,
                status: o.status,
                total_amount: o.total_amount,
                created_at: o.created_at,
            })
            .collect();

        Ok(DashboardMetrics {
            restaurant_id,
            todays_orders: todays_count,
            todays_revenue,
            average_order_value,
            low_stock_count,
            active_campaigns,
            pending_applications,
            recent_orders,
            low_stock_items,
            generated_at: now,
        })
    }
}

