use crate::{
    db::DbPool,
    entities::customer::{self, Entity as CustomerEntity},
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
        OrderSource, OrderStatus, PaymentStatus,
    },
    entities::order_item::{
        self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
        Model as OrderItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub inventory_item_id: Option<Uuid>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub source: OrderSource,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<OrderLineRequest>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Customer phone is required"))]
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub message_thread_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub inventory_item_id: Option<Uuid>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub order_number: String,
    pub source: OrderSource,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub items: Vec<OrderLineResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// One historical consumption observation for an inventory item, the input
/// contract of the demand forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalOrderLine {
    pub quantity: Decimal,
    pub ordered_at: DateTime<Utc>,
}

/// Service for dining orders: CRUD plus the order-history read used by
/// demand forecasting.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an order with its line items. The stored total is always the
    /// exact sum of line quantity x price; no caller-supplied total is
    /// trusted. When the order references a known customer, that customer's
    /// aggregates are updated in the same transaction.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let total_amount: Decimal = request
            .items
            .iter()
            .map(|line| line.quantity * line.price)
            .sum();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::from(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            restaurant_id: Set(request.restaurant_id),
            customer_id: Set(request.customer_id),
            order_number: Set(generate_order_number()),
            source: Set(request.source),
            status: Set(OrderStatus::Received),
            total_amount: Set(total_amount),
            payment_status: Set(request.payment_status),
            payment_method: Set(request.payment_method.clone()),
            customer_name: Set(request.customer_name.clone()),
            customer_phone: Set(request.customer_phone.clone()),
            customer_address: Set(request.customer_address.clone()),
            message_thread_id: Set(request.message_thread_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order");
            ServiceError::from(e)
        })?;

        let mut item_models = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let item = OrderItemActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                restaurant_id: Set(request.restaurant_id),
                inventory_item_id: Set(line.inventory_item_id),
                name: Set(line.name.clone()),
                quantity: Set(line.quantity),
                price: Set(line.price),
                notes: Set(line.notes.clone()),
                category: Set(line.category.clone()),
                created_at: Set(now),
            };
            let model = item.insert(&txn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order line");
                ServiceError::from(e)
            })?;
            item_models.push(model);
        }

        if let Some(customer_id) = request.customer_id {
            self.bump_customer_aggregates(&txn, customer_id, total_amount, now)
                .await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation");
            ServiceError::from(e)
        })?;

        info!(order_id = %order_id, %total_amount, "Order created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderCreated(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order created event");
            }
        }

        Ok(model_to_response(order_model, item_models))
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;

        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        Ok(model_to_response(order, items))
    }

    /// Lists a restaurant's orders, newest first, optionally filtered by status.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn list_orders(
        &self,
        restaurant_id: Uuid,
        status: Option<OrderStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = OrderEntity::find().filter(order::Column::RestaurantId.eq(restaurant_id));
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(db, per_page.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::from)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::from)?;

        let mut responses = Vec::with_capacity(orders.len());
        for order_model in orders {
            let items = OrderItemEntity::find()
                .filter(order_item::Column::OrderId.eq(order_model.id))
                .all(db)
                .await
                .map_err(ServiceError::from)?;
            responses.push(model_to_response(order_model, items));
        }

        Ok(OrderListResponse {
            orders: responses,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = order.status;
        let mut active: OrderActiveModel = order.into();
        active.status = Set(request.status);
        active.updated_at = Set(now);

        let updated = active.update(db).await.map_err(ServiceError::from)?;

        info!(
            order_id = %order_id,
            old_status = old_status.as_str(),
            new_status = request.status.as_str(),
            "Order status updated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderStatusChanged {
                    order_id,
                    old_status: old_status.as_str().to_string(),
                    new_status: request.status.as_str().to_string(),
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send status changed event");
            }
        }

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        Ok(model_to_response(updated, items))
    }

    /// Order History Reader: the consumption observations for one inventory
    /// item over a trailing window, used by the demand forecaster. Lines on
    /// cancelled orders never counted as consumption.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id, item_id = %inventory_item_id))]
    pub async fn historical_order_lines(
        &self,
        restaurant_id: Uuid,
        inventory_item_id: Uuid,
        since_days: u32,
    ) -> Result<Vec<HistoricalOrderLine>, ServiceError> {
        let db = &*self.db_pool;
        let since = Utc::now() - Duration::days(i64::from(since_days));

        let lines = OrderItemEntity::find()
            .join(JoinType::InnerJoin, order_item::Relation::Order.def())
            .filter(order::Column::Status.ne(OrderStatus::Cancelled))
            .filter(order_item::Column::RestaurantId.eq(restaurant_id))
            .filter(order_item::Column::InventoryItemId.eq(inventory_item_id))
            .filter(order_item::Column::CreatedAt.gte(since))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        Ok(lines
            .into_iter()
            .map(|line| HistoricalOrderLine {
                quantity: line.quantity,
                ordered_at: line.created_at,
            })
            .collect())
    }

    async fn bump_customer_aggregates<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: Uuid,
        order_total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let customer = CustomerEntity::find_by_id(customer_id)
            .one(conn)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", customer_id))
            })?;

        let total_orders = customer.total_orders + 1;
        let total_spent = customer.total_spent + order_total;

        let mut active: customer::ActiveModel = customer.into();
        active.total_orders = Set(total_orders);
        active.total_spent = Set(total_spent);
        active.last_order_date = Set(Some(now));
        active.update(conn).await.map_err(ServiceError::from)?;

        Ok(())
    }
}

fn generate_order_number() -> String {
    format!("ORD-{}", Uuid::new_v4().simple())
}

fn model_to_response(model: OrderModel, items: Vec<OrderItemModel>) -> OrderResponse {
    OrderResponse {
        id: model.id,
        restaurant_id: model.restaurant_id,
        customer_id: model.customer_id,
        order_number: model.order_number,
        source: model.source,
        status: model.status,
        total_amount: model.total_amount,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        items: items
            .into_iter()
            .map(|item| OrderLineResponse {
                id: item.id,
                name: item.name,
                quantity: item.quantity,
                price: item.price,
                inventory_item_id: item.inventory_item_id,
                notes: item.notes,
                category: item.category,
            })
            .collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::DatabaseConnection;

    #[test]
    fn model_to_response_carries_lines_and_total() {
        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let restaurant_id = Uuid::new_v4();

        let model = OrderModel {
            id: order_id,
            restaurant_id,
            customer_id: None,
            order_number: "ORD-test".into(),
            source: OrderSource::Whatsapp,
            status: OrderStatus::Received,
            total_amount: dec!(25.50),
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            customer_name: "Asha".into(),
            customer_phone: "+911234567890".into(),
            customer_address: None,
            message_thread_id: Some("thread-1".into()),
            created_at: now,
            updated_at: now,
        };
        let items = vec![OrderItemModel {
            id: Uuid::new_v4(),
            order_id,
            restaurant_id,
            inventory_item_id: None,
            name: "Paneer Tikka".into(),
            quantity: dec!(2),
            price: dec!(12.75),
            notes: None,
            category: Some("mains".into()),
            created_at: now,
        }];

        let response = model_to_response(model, items);
        assert_eq!(response.total_amount, dec!(25.50));
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].quantity, dec!(2));
    }

    #[test]
    fn create_request_total_is_exact_line_sum() {
        let items = [
            OrderLineRequest {
                name: "a".into(),
                quantity: dec!(2),
                price: dec!(0.10),
                inventory_item_id: None,
                notes: None,
                category: None,
            },
            OrderLineRequest {
                name: "b".into(),
                quantity: dec!(3),
                price: dec!(0.20),
                inventory_item_id: None,
                notes: None,
                category: None,
            },
        ];
        let total: Decimal = items.iter().map(|l| l.quantity * l.price).sum();
        assert_eq!(total, dec!(0.80));
    }

    #[tokio::test]
    async fn create_order_rejects_empty_line_items() {
        let service = OrderService::new(Arc::new(DatabaseConnection::Disconnected), None);
        let request = CreateOrderRequest {
            restaurant_id: Uuid::new_v4(),
            customer_id: None,
            source: OrderSource::Website,
            items: vec![],
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            customer_name: "Asha".into(),
            customer_phone: "+911234567890".into(),
            customer_address: None,
            message_thread_id: None,
        };

        let err = service.create_order(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
