use crate::{
    db::DbPool,
    entities::restaurant::{self, Entity as RestaurantEntity, Model as RestaurantModel},
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
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: String,
    #[validate(length(min = 5, max = 32, message = "Phone must be between 5 and 32 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Tenant registry. The restaurant row anchors every other table.
#[derive(Clone)]
pub struct RestaurantService {
    db_pool: Arc<DbPool>,
}

impl RestaurantService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request))]
    pub async fn create_restaurant(
        &self,
        request: CreateRestaurantRequest,
    ) -> Result<RestaurantModel, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;
        let restaurant = restaurant::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            address: Set(request.address),
            phone: Set(request.phone),
            email: Set(request.email),
            timezone: Set(request.timezone),
            currency: Set(request.currency),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        let model = restaurant.insert(db).await.map_err(ServiceError::from)?;
        info!(restaurant_id = %model.id, name = %model.name, "Restaurant created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: Uuid) -> Result<RestaurantModel, ServiceError> {
        let db = &*self.db_pool;
        RestaurantEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Restaurant {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<RestaurantModel>, ServiceError> {
        let db = &*self.db_pool;
        RestaurantEntity::find()
            .filter(restaurant::Column::IsActive.eq(true))
            .order_by_asc(restaurant::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    #[tokio::test]
    async fn create_rejects_bad_email() {
        let service = RestaurantService::new(Arc::new(DatabaseConnection::Disconnected));
        let result = service
            .create_restaurant(CreateRestaurantRequest {
                name: "La Plaza".into(),
                address: "Calle Mayor 1".into(),
                phone: "+34600111222".into(),
                email: "nope".into(),
                timezone: default_timezone(),
                currency: default_currency(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
