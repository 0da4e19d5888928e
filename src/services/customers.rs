use crate::{
    db::DbPool,
    entities::customer::{self, CustomerStatus, Entity as CustomerEntity, Model as CustomerModel},
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
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 5, max = 32, message = "Phone must be between 5 and 32 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 32, message = "Phone must be between 5 and 32 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub preferences: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub total_orders: i32,
    pub total_spent: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_order_date: Option<DateTime<Utc>>,
    pub loyalty_points: i32,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn string_list(value: &serde_json::Value) -> Vec<String> {
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

fn model_to_response(model: CustomerModel) -> CustomerResponse {
    CustomerResponse {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        preferences: string_list(&model.preferences),
        dietary_restrictions: string_list(&model.dietary_restrictions),
        total_orders: model.total_orders,
        total_spent: model.total_spent,
        last_order_date: model.last_order_date,
        loyalty_points: model.loyalty_points,
        status: model.status,
        created_at: model.created_at,
    }
}

#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a customer profile. Phone numbers are unique per restaurant;
    /// a duplicate is rejected before any write.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;

        let existing = CustomerEntity::find()
            .filter(customer::Column::RestaurantId.eq(request.restaurant_id))
            .filter(customer::Column::Phone.eq(request.phone.clone()))
            .one(db)
            .await
            .map_err(ServiceError::from)?;
        if existing.is_some() {
            return Err(ServiceError::InvalidOperation(format!(
                "A customer with phone {} already exists",
                request.phone
            )));
        }

        let now = Utc::now();
        let customer = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name),
            phone: Set(request.phone),
            email: Set(request.email),
            preferences: Set(serde_json::json!(request.preferences)),
            dietary_restrictions: Set(serde_json::json!(request.dietary_restrictions)),
            total_orders: Set(0),
            total_spent: Set(Decimal::ZERO),
            last_order_date: Set(None),
            loyalty_points: Set(0),
            status: Set(CustomerStatus::Active),
            created_at: Set(now),
        };
        let model = customer.insert(db).await.map_err(ServiceError::from)?;

        info!(customer_id = %model.id, "Customer created");
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::CustomerCreated {
                    customer_id: model.id,
                    restaurant_id: model.restaurant_id,
                })
                .await
            {
                warn!(error = %e, customer_id = %model.id, "Failed to send customer created event");
            }
        }

        Ok(model_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: Uuid) -> Result<CustomerResponse, ServiceError> {
        let db = &*self.db_pool;
        let model = CustomerEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))?;
        Ok(model_to_response(model))
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        restaurant_id: Uuid,
        status: Option<CustomerStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<CustomerListResponse, ServiceError> {
        let db = &*self.db_pool;
        let mut query = CustomerEntity::find()
            .filter(customer::Column::RestaurantId.eq(restaurant_id));
        if let Some(status) = status {
            query = query.filter(customer::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(customer::Column::CreatedAt)
            .paginate(db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::from)?;
        let customers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::from)?;

        Ok(CustomerListResponse {
            customers: customers.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;
        let model = CustomerEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))?;

        let mut active: customer::ActiveModel = model.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(preferences) = request.preferences {
            active.preferences = Set(serde_json::json!(preferences));
        }
        if let Some(dietary) = request.dietary_restrictions {
            active.dietary_restrictions = Set(serde_json::json!(dietary));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }

        let updated = active.update(db).await.map_err(ServiceError::from)?;
        Ok(model_to_response(updated))
    }

    /// Looks up a customer by phone, creating a minimal profile when none
    /// exists. Used by the messaging pipeline.
    #[instrument(skip(self))]
    pub async fn find_or_create_by_phone(
        &self,
        restaurant_id: Uuid,
        phone: &str,
        fallback_name: &str,
    ) -> Result<CustomerModel, ServiceError> {
        let db = &*self.db_pool;
        if let Some(existing) = CustomerEntity::find()
            .filter(customer::Column::RestaurantId.eq(restaurant_id))
            .filter(customer::Column::Phone.eq(phone))
            .one(db)
            .await
            .map_err(ServiceError::from)?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let customer = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(restaurant_id),
            name: Set(fallback_name.to_string()),
            phone: Set(phone.to_string()),
            email: Set(None),
            preferences: Set(serde_json::json!([])),
            dietary_restrictions: Set(serde_json::json!([])),
            total_orders: Set(0),
            total_spent: Set(Decimal::ZERO),
            last_order_date: Set(None),
            loyalty_points: Set(0),
            status: Set(CustomerStatus::Active),
            created_at: Set(now),
        };
        let model = customer.insert(db).await.map_err(ServiceError::from)?;
        info!(customer_id = %model.id, "Customer created from inbound message");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(DatabaseConnection::Disconnected), None)
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let request = CreateCustomerRequest {
            restaurant_id: Uuid::new_v4(),
            name: "".into(),
            phone: "+34600111222".into(),
            email: None,
            preferences: vec![],
            dietary_restrictions: vec![],
        };
        let result = service().create_customer(request).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_rejects_malformed_email() {
        let request = CreateCustomerRequest {
            restaurant_id: Uuid::new_v4(),
            name: "Maria".into(),
            phone: "+34600111222".into(),
            email: Some("not-an-email".into()),
            preferences: vec![],
            dietary_restrictions: vec![],
        };
        let result = service().create_customer(request).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn string_list_tolerates_non_array_json() {
        assert!(string_list(&serde_json::json!("oops")).is_empty());
        assert_eq!(
            string_list(&serde_json::json!(["vegan", "gluten-free"])),
            vec!["vegan".to_string(), "gluten-free".to_string()]
        );
    }
}
