// Not every test binary touches the whole harness.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tablestack_api::{
    config::{AppConfig, DatabasePoolConfig, ForecastingConfig, PaginationConfig},
    db::{self, DbPool},
    entities::{inventory_item, restaurant, supplier},
    events,
    handlers::AppServices,
    AppState,
};
use uuid::Uuid;

/// Test harness over an in-memory SQLite database with the full schema
/// applied. Each instance is fully isolated.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = test_config();

        let pool = db::establish_connection(&cfg.database_url)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let pool = Arc::new(pool);

        let (event_sender, event_rx) = events::create_event_channel(64);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(pool, cfg, event_sender);
        Self {
            state,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &Arc<DbPool> {
        &self.state.db
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    /// Inserts a restaurant row and returns its id.
    pub async fn seed_restaurant(&self) -> Uuid {
        let id = Uuid::new_v4();
        restaurant::ActiveModel {
            id: Set(id),
            name: Set("Test Bistro".into()),
            address: Set("1 Test Street".into()),
            phone: Set("+34600000000".into()),
            email: Set("owner@test-bistro.example".into()),
            timezone: Set("UTC".into()),
            currency: Set("EUR".into()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&**self.db())
        .await
        .expect("failed to seed restaurant");
        id
    }

    pub async fn seed_supplier(&self, restaurant_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        supplier::ActiveModel {
            id: Set(id),
            restaurant_id: Set(restaurant_id),
            name: Set("Fresh Produce Co".into()),
            contact_person: Set("Luis".into()),
            phone: Set("+34600000001".into()),
            email: Set("orders@freshproduce.example".into()),
            address: Set("2 Market Road".into()),
            rating: Set(4.5),
            payment_terms: Set("net 30".into()),
            categories: Set(serde_json::json!(["produce"])),
            on_time_delivery: Set(0.95),
            quality_rating: Set(4.4),
            response_time_hours: Set(4.0),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&**self.db())
        .await
        .expect("failed to seed supplier");
        id
    }

    /// Inserts an inventory item with explicit stock numbers and an optional
    /// weekly demand forecast.
    #[allow(clippy::too_many_arguments)]
    pub async fn seed_item(
        &self,
        restaurant_id: Uuid,
        supplier_id: Option<Uuid>,
        name: &str,
        current: Decimal,
        minimum: Decimal,
        maximum: Decimal,
        cost: Decimal,
        weekly_rate: Option<Decimal>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        inventory_item::ActiveModel {
            id: Set(id),
            restaurant_id: Set(restaurant_id),
            name: Set(name.into()),
            category: Set("produce".into()),
            unit: Set("kg".into()),
            current_quantity: Set(current),
            minimum_threshold: Set(minimum),
            maximum_threshold: Set(maximum),
            cost_per_unit: Set(cost),
            supplier_id: Set(supplier_id),
            last_restocked: Set(None),
            expiry_date: Set(None),
            status: Set(inventory_item::InventoryStatus::from_quantity(
                current, minimum,
            )),
            predicted_demand_per_week: Set(weekly_rate),
            forecast_confidence: Set(weekly_rate.map(|_| 0.8)),
            reorder_date: Set(None),
            forecast_generated_at: Set(weekly_rate.map(|_| now)),
            is_active: Set(true),
            last_updated: Set(now),
            created_at: Set(now),
        }
        .insert(&**self.db())
        .await
        .expect("failed to seed inventory item");
        id
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 18080,
        environment: "test".into(),
        log_level: "debug".into(),
        log_json: false,
        auto_migrate: true,
        cors_allowed_origins: None,
        cors_allow_any_origin: true,
        forecasting: ForecastingConfig::default(),
        database: DatabasePoolConfig::default(),
        pagination: PaginationConfig::default(),
        event_channel_capacity: 64,
    }
}
