use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services;
use crate::services::replenishment::ReplenishmentLocks;
use std::sync::Arc;

pub mod common;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod marketing;
pub mod orders;
pub mod purchase_orders;
pub mod restaurants;
pub mod staff;
pub mod suppliers;

/// Every service the handlers reach through [`crate::AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub restaurants: services::RestaurantService,
    pub suppliers: services::SupplierService,
    pub inventory: services::InventoryService,
    pub forecasting: services::ForecastingService,
    pub replenishment: services::ReplenishmentService,
    pub purchase_orders: services::PurchaseOrderService,
    pub orders: services::OrderService,
    pub customers: services::CustomerService,
    pub staff: services::StaffService,
    pub marketing: services::MarketingService,
    pub messaging: services::MessagingService,
    pub dashboard: services::DashboardService,
    pub analytics: services::AnalyticsService,
}

impl AppServices {
    pub fn build(db: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let sender = Arc::new(event_sender);
        Self {
            restaurants: services::RestaurantService::new(db.clone()),
            suppliers: services::SupplierService::new(db.clone()),
            inventory: services::InventoryService::new(db.clone(), Some(sender.clone())),
            forecasting: services::ForecastingService::new(
                db.clone(),
                Some(sender.clone()),
                config.forecasting.clone(),
            ),
            replenishment: services::ReplenishmentService::new(
                db.clone(),
                Some(sender.clone()),
                ReplenishmentLocks::new(),
                config.forecasting.clone(),
            ),
            purchase_orders: services::PurchaseOrderService::new(db.clone(), Some(sender.clone())),
            orders: services::OrderService::new(db.clone(), Some(sender.clone())),
            customers: services::CustomerService::new(db.clone(), Some(sender.clone())),
            staff: services::StaffService::new(db.clone(), Some(sender.clone())),
            marketing: services::MarketingService::new(db.clone(), Some(sender.clone())),
            messaging: services::MessagingService::new(db.clone(), Some(sender)),
            dashboard: services::DashboardService::new(db.clone()),
            analytics: services::AnalyticsService::new(db),
        }
    }
}
