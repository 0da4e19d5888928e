use crate::{
    db::DbPool,
    entities::purchase_order::{
        self, Entity as PoEntity, Model as PoModel, PurchaseOrderStatus,
    },
    entities::purchase_order_item::{
        self, Entity as PoItemEntity, Model as PoItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub supplier_id: Uuid,
    pub order_number: String,
    pub status: PurchaseOrderStatus,
    pub total_amount: Decimal,
    pub ai_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reasoning: Option<String>,
    pub expected_delivery: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
    pub items: Vec<PurchaseOrderLineResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderLineResponse {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderListResponse {
    pub purchase_orders: Vec<PurchaseOrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseOrderStatusRequest {
    pub status: PurchaseOrderStatus,
}

fn model_to_response(po: PoModel, items: Vec<PoItemModel>) -> PurchaseOrderResponse {
    PurchaseOrderResponse {
        id: po.id,
        restaurant_id: po.restaurant_id,
        supplier_id: po.supplier_id,
        order_number: po.order_number,
        status: po.status,
        total_amount: po.total_amount,
        ai_generated: po.ai_generated,
        ai_reasoning: po.ai_reasoning,
        expected_delivery: po.expected_delivery,
        actual_delivery: po.actual_delivery,
        items: items
            .into_iter()
            .map(|line| PurchaseOrderLineResponse {
                id: line.id,
                inventory_item_id: line.inventory_item_id,
                item_name: line.item_name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
            })
            .collect(),
        created_at: po.created_at,
        updated_at: po.updated_at,
    }
}

/// Read and lifecycle operations over purchase orders. Creation happens in
/// the replenishment planner.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        id: Uuid,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let po = PoEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;
        let items = PoItemEntity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(id))
            .all(db)
            .await
            .map_err(ServiceError::from)?;
        Ok(model_to_response(po, items))
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        restaurant_id: Uuid,
        supplier_id: Option<Uuid>,
        status: Option<PurchaseOrderStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<PurchaseOrderListResponse, ServiceError> {
        let db = &*self.db_pool;
        let mut query = PoEntity::find()
            .filter(purchase_order::Column::RestaurantId.eq(restaurant_id));
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
        }
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(purchase_order::Column::CreatedAt)
            .paginate(db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::from)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::from)?;

        let mut responses = Vec::with_capacity(orders.len());
        for po in orders {
            let items = PoItemEntity::find()
                .filter(purchase_order_item::Column::PurchaseOrderId.eq(po.id))
                .all(db)
                .await
                .map_err(ServiceError::from)?;
            responses.push(model_to_response(po, items));
        }

        Ok(PurchaseOrderListResponse {
            purchase_orders: responses,
            total,
            page,
            per_page,
        })
    }

    /// Applies one lifecycle transition. Anything the state machine does not
    /// permit is rejected without touching the row.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: PurchaseOrderStatus,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let po = PoEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        let old_status = po.status;
        if !old_status.can_transition_to(new_status) {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot transition purchase order from {} to {}",
                old_status.as_str(),
                new_status.as_str()
            )));
        }

        let now = Utc::now();
        let mut active: purchase_order::ActiveModel = po.into();
        active.status = Set(new_status);
        active.updated_at = Set(now);
        if new_status == PurchaseOrderStatus::Delivered {
            active.actual_delivery = Set(Some(now));
        }
        let updated = active.update(db).await.map_err(ServiceError::from)?;

        info!(
            purchase_order_id = %id,
            from = old_status.as_str(),
            to = new_status.as_str(),
            "Purchase order status updated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::PurchaseOrderStatusChanged {
                    purchase_order_id: id,
                    old_status: old_status.as_str().to_string(),
                    new_status: new_status.as_str().to_string(),
                })
                .await
            {
                warn!(error = %e, purchase_order_id = %id, "Failed to send purchase order status event");
            }
        }

        let items = PoItemEntity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(id))
            .all(db)
            .await
            .map_err(ServiceError::from)?;
        Ok(model_to_response(updated, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_line_totals_round_trip_from_models() {
        use rust_decimal_macros::dec;
        let now = Utc::now();
        let po_id = Uuid::new_v4();
        let po = PoModel {
            id: po_id,
            restaurant_id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            order_number: "PO-1-0001".into(),
            status: PurchaseOrderStatus::AiGenerated,
            total_amount: dec!(450),
            ai_generated: true,
            ai_reasoning: Some("AI-generated purchase order based on:\n".into()),
            expected_delivery: now,
            actual_delivery: None,
            created_at: now,
            updated_at: now,
        };
        let line = PoItemModel {
            id: Uuid::new_v4(),
            purchase_order_id: po_id,
            inventory_item_id: Uuid::new_v4(),
            item_name: "Tomatoes".into(),
            quantity: dec!(90),
            unit_price: dec!(5),
            total_price: dec!(450),
            created_at: now,
        };
        let response = model_to_response(po, vec![line]);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].total_price, dec!(450));
        assert_eq!(response.total_amount, dec!(450));
    }
}
