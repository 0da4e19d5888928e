pub mod analytics;
pub mod customers;
pub mod dashboard;
pub mod forecasting;
pub mod inventory;
pub mod marketing;
pub mod messaging;
pub mod orders;
pub mod purchase_orders;
pub mod replenishment;
pub mod restaurants;
pub mod staff;
pub mod stock;
pub mod suppliers;

pub use analytics::AnalyticsService;
pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use forecasting::ForecastingService;
pub use inventory::InventoryService;
pub use marketing::MarketingService;
pub use messaging::MessagingService;
pub use orders::OrderService;
pub use purchase_orders::PurchaseOrderService;
pub use replenishment::ReplenishmentService;
pub use restaurants::RestaurantService;
pub use staff::StaffService;
pub use suppliers::SupplierService;
