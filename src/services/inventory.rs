use crate::{
    db::DbPool,
    entities::inventory_item::{
        self, ActiveModel as ItemActiveModel, Entity as ItemEntity, InventoryStatus,
        Model as ItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock::{self, StockEvaluation},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub current_quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub maximum_threshold: Decimal,
    pub cost_per_unit: Decimal,
    pub supplier_id: Option<Uuid>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub current_quantity: Option<Decimal>,
    pub minimum_threshold: Option<Decimal>,
    pub maximum_threshold: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    /// Quantity to add to the current stock level.
    pub quantity: Decimal,
}

/// An inventory item together with its derived stock evaluation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub maximum_threshold: Decimal,
    pub cost_per_unit: Decimal,
    pub supplier_id: Option<Uuid>,
    pub last_restocked: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: InventoryStatus,
    pub predicted_demand_per_week: Option<Decimal>,
    pub forecast_confidence: Option<f64>,
    pub reorder_date: Option<DateTime<Utc>>,
    pub needs_reorder: bool,
    pub days_until_empty: Option<i64>,
    pub last_updated: DateTime<Utc>,
}

/// Service for inventory items: CRUD, stock views and forecast persistence.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an inventory item. Thresholds must satisfy
    /// `maximum > minimum >= 0`; quantities and cost must be non-negative.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id, name = %request.name))]
    pub async fn create_item(
        &self,
        request: CreateInventoryItemRequest,
    ) -> Result<InventoryItemView, ServiceError> {
        request.validate()?;
        validate_thresholds(
            request.minimum_threshold,
            request.maximum_threshold,
            request.current_quantity,
            request.cost_per_unit,
        )?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let item_id = Uuid::new_v4();
        let status =
            InventoryStatus::from_quantity(request.current_quantity, request.minimum_threshold);

        let active = ItemActiveModel {
            id: Set(item_id),
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name.clone()),
            category: Set(request.category),
            unit: Set(request.unit),
            current_quantity: Set(request.current_quantity),
            minimum_threshold: Set(request.minimum_threshold),
            maximum_threshold: Set(request.maximum_threshold),
            cost_per_unit: Set(request.cost_per_unit),
            supplier_id: Set(request.supplier_id),
            last_restocked: Set(None),
            expiry_date: Set(request.expiry_date),
            status: Set(status),
            predicted_demand_per_week: Set(None),
            forecast_confidence: Set(None),
            reorder_date: Set(None),
            forecast_generated_at: Set(None),
            is_active: Set(true),
            last_updated: Set(now),
            created_at: Set(now),
        };

        let model = active.insert(db).await.map_err(ServiceError::from)?;
        info!(item_id = %item_id, "Inventory item created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InventoryItemCreated(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send item created event");
            }
        }

        Ok(model_to_view(model))
    }

    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        request: UpdateInventoryItemRequest,
    ) -> Result<InventoryItemView, ServiceError> {
        let db = &*self.db_pool;
        let item = self.get_item_model(item_id).await?;
        let now = Utc::now();

        let minimum = request.minimum_threshold.unwrap_or(item.minimum_threshold);
        let maximum = request.maximum_threshold.unwrap_or(item.maximum_threshold);
        let quantity = request.current_quantity.unwrap_or(item.current_quantity);
        let cost = request.cost_per_unit.unwrap_or(item.cost_per_unit);
        validate_thresholds(minimum, maximum, quantity, cost)?;

        let old_quantity = item.current_quantity;
        let mut active: ItemActiveModel = item.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(unit) = request.unit {
            active.unit = Set(unit);
        }
        if let Some(supplier_id) = request.supplier_id {
            active.supplier_id = Set(Some(supplier_id));
        }
        if let Some(expiry_date) = request.expiry_date {
            active.expiry_date = Set(Some(expiry_date));
        }
        active.current_quantity = Set(quantity);
        active.minimum_threshold = Set(minimum);
        active.maximum_threshold = Set(maximum);
        active.cost_per_unit = Set(cost);
        // Status is derived; recompute it on every quantity or threshold write.
        active.status = Set(InventoryStatus::from_quantity(quantity, minimum));
        active.last_updated = Set(now);

        let updated = active.update(db).await.map_err(ServiceError::from)?;

        if old_quantity != updated.current_quantity {
            self.emit_quantity_events(&updated, old_quantity).await;
        }

        Ok(model_to_view(updated))
    }

    /// Soft-deletes an item; it disappears from listings and planning.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn deactivate_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let item = self.get_item_model(item_id).await?;

        let mut active: ItemActiveModel = item.into();
        active.is_active = Set(false);
        active.last_updated = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::from)?;

        info!(item_id = %item_id, "Inventory item deactivated");
        Ok(())
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<InventoryItemView, ServiceError> {
        Ok(model_to_view(self.get_item_model(item_id).await?))
    }

    /// Lists a restaurant's active items with their stock evaluations,
    /// optionally restricted to one category.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn list_items(
        &self,
        restaurant_id: Uuid,
        category: Option<String>,
    ) -> Result<Vec<InventoryItemView>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = ItemEntity::find()
            .filter(inventory_item::Column::RestaurantId.eq(restaurant_id))
            .filter(inventory_item::Column::IsActive.eq(true));
        if let Some(category) = category {
            query = query.filter(inventory_item::Column::Category.eq(category));
        }

        let items = query
            .order_by_asc(inventory_item::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        Ok(items.into_iter().map(model_to_view).collect())
    }

    /// Active items at or below their minimum threshold.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn low_stock_items(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<InventoryItemView>, ServiceError> {
        let items = self.list_items(restaurant_id, None).await?;
        Ok(items.into_iter().filter(|i| i.needs_reorder).collect())
    }

    /// Adds stock, recomputes the derived status and stamps last_restocked.
    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn restock(
        &self,
        item_id: Uuid,
        request: RestockRequest,
    ) -> Result<InventoryItemView, ServiceError> {
        if request.quantity <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Restock quantity must be positive".into(),
            ));
        }

        let db = &*self.db_pool;
        let item = self.get_item_model(item_id).await?;
        let now = Utc::now();

        let old_quantity = item.current_quantity;
        let new_quantity = old_quantity + request.quantity;
        let minimum = item.minimum_threshold;

        let mut active: ItemActiveModel = item.into();
        active.current_quantity = Set(new_quantity);
        active.status = Set(InventoryStatus::from_quantity(new_quantity, minimum));
        active.last_restocked = Set(Some(now));
        active.last_updated = Set(now);

        let updated = active.update(db).await.map_err(ServiceError::from)?;
        info!(item_id = %item_id, %old_quantity, %new_quantity, "Inventory item restocked");

        self.emit_quantity_events(&updated, old_quantity).await;

        Ok(model_to_view(updated))
    }

    /// Persists a demand forecast onto the item. Last write wins; only the
    /// forecasting service calls this.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_item_prediction(
        &self,
        item_id: Uuid,
        predicted_demand_per_week: Decimal,
        confidence: f64,
        reorder_date: Option<DateTime<Utc>>,
        generated_at: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        if predicted_demand_per_week < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Predicted demand cannot be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ServiceError::InvalidInput(
                "Confidence must be within [0, 1]".into(),
            ));
        }

        let db = &*self.db_pool;
        let item = self.get_item_model(item_id).await?;

        let mut active: ItemActiveModel = item.into();
        active.predicted_demand_per_week = Set(Some(predicted_demand_per_week));
        active.forecast_confidence = Set(Some(confidence));
        active.reorder_date = Set(reorder_date);
        active.forecast_generated_at = Set(Some(generated_at));
        active.last_updated = Set(generated_at);
        active.update(db).await.map_err(ServiceError::from)?;

        Ok(())
    }

    /// Fetches the raw entity model, erroring when missing or inactive.
    pub(crate) async fn get_item_model(&self, item_id: Uuid) -> Result<ItemModel, ServiceError> {
        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        if !item.is_active {
            return Err(ServiceError::NotFound(format!(
                "Inventory item {} not found",
                item_id
            )));
        }
        Ok(item)
    }

    async fn emit_quantity_events(&self, item: &ItemModel, old_quantity: Decimal) {
        let Some(event_sender) = &self.event_sender else {
            return;
        };

        if let Err(e) = event_sender
            .send(Event::InventoryAdjusted {
                item_id: item.id,
                old_quantity,
                new_quantity: item.current_quantity,
            })
            .await
        {
            warn!(error = %e, item_id = %item.id, "Failed to send inventory adjusted event");
        }

        if item.current_quantity <= item.minimum_threshold {
            if let Err(e) = event_sender
                .send(Event::InventoryLow {
                    item_id: item.id,
                    restaurant_id: item.restaurant_id,
                    current_quantity: item.current_quantity,
                    minimum_threshold: item.minimum_threshold,
                })
                .await
            {
                warn!(error = %e, item_id = %item.id, "Failed to send inventory low event");
            }
        }
    }
}

fn validate_thresholds(
    minimum: Decimal,
    maximum: Decimal,
    quantity: Decimal,
    cost: Decimal,
) -> Result<(), ServiceError> {
    if minimum < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Minimum threshold cannot be negative".into(),
        ));
    }
    if maximum <= minimum {
        return Err(ServiceError::ValidationError(
            "Maximum threshold must exceed minimum threshold".into(),
        ));
    }
    if quantity < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Quantity cannot be negative".into(),
        ));
    }
    if cost < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Cost per unit cannot be negative".into(),
        ));
    }
    Ok(())
}

fn model_to_view(model: ItemModel) -> InventoryItemView {
    let StockEvaluation {
        needs_reorder,
        days_until_empty,
    } = stock::evaluate(&model);

    InventoryItemView {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        category: model.category,
        unit: model.unit,
        current_quantity: model.current_quantity,
        minimum_threshold: model.minimum_threshold,
        maximum_threshold: model.maximum_threshold,
        cost_per_unit: model.cost_per_unit,
        supplier_id: model.supplier_id,
        last_restocked: model.last_restocked,
        expiry_date: model.expiry_date,
        status: model.status,
        predicted_demand_per_week: model.predicted_demand_per_week,
        forecast_confidence: model.forecast_confidence,
        reorder_date: model.reorder_date,
        needs_reorder,
        days_until_empty,
        last_updated: model.last_updated,
    }
}
