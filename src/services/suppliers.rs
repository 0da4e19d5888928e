use crate::{
    db::DbPool,
    entities::supplier::{self, Entity as SupplierEntity, Model as SupplierModel},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Contact person must be between 1 and 255 characters"))]
    pub contact_person: String,
    #[validate(length(min = 5, max = 32, message = "Phone must be between 5 and 32 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_payment_terms")]
    pub payment_terms: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_payment_terms() -> String {
    "net 30".to_string()
}

#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;
        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name),
            contact_person: Set(request.contact_person),
            phone: Set(request.phone),
            email: Set(request.email),
            address: Set(request.address),
            rating: Set(0.0),
            payment_terms: Set(request.payment_terms),
            categories: Set(serde_json::json!(request.categories)),
            on_time_delivery: Set(0.0),
            quality_rating: Set(0.0),
            response_time_hours: Set(0.0),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        let model = supplier.insert(db).await.map_err(ServiceError::from)?;
        info!(supplier_id = %model.id, name = %model.name, "Supplier created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: Uuid) -> Result<SupplierModel, ServiceError> {
        let db = &*self.db_pool;
        SupplierEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<SupplierModel>, ServiceError> {
        let db = &*self.db_pool;
        SupplierEntity::find()
            .filter(supplier::Column::RestaurantId.eq(restaurant_id))
            .filter(supplier::Column::IsActive.eq(true))
            .order_by_asc(supplier::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::from)
    }
}
