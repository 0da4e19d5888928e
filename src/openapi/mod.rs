use utoipa::{openapi::OpenApi as OpenApiSpec, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TableStack API",
        version = "0.3.0",
        description = r#"
# TableStack Restaurant Operations API

Multi-tenant backend for restaurant operations: inventory tracking with
demand forecasting and automated replenishment, order and customer
management, hiring, marketing campaigns and a dashboard rollup.

Every operation is scoped to a single restaurant via an explicit
`restaurant_id`.

## Pagination

List endpoints take `page` (default 1) and `per_page` (default 20, max 100)
query parameters.

## Error Handling

Errors use a consistent JSON body with a request id for tracing:

```json
{
  "error": "Validation Error",
  "message": "Maximum threshold must be greater than minimum",
  "request_id": "b8e2-...",
  "timestamp": "2026-08-30T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "inventory", description = "Inventory and forecasting endpoints"),
        (name = "purchase-orders", description = "Replenishment and purchase order lifecycle"),
        (name = "dashboard", description = "Operational rollups")
    ),
    paths(
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::low_stock_items,
        crate::handlers::inventory::create_item,
        crate::handlers::inventory::forecast_item_demand,
        crate::handlers::purchase_orders::generate_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order_status,
        crate::handlers::dashboard::dashboard_metrics,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::services::inventory::CreateInventoryItemRequest,
            crate::services::inventory::UpdateInventoryItemRequest,
            crate::services::inventory::RestockRequest,
            crate::services::inventory::InventoryItemView,
            crate::services::forecasting::ForecastDemandRequest,
            crate::services::forecasting::ForecastResponse,
            crate::services::replenishment::GeneratePurchaseOrderRequest,
            crate::services::replenishment::ReplenishmentOutcome,
            crate::services::purchase_orders::PurchaseOrderResponse,
            crate::services::purchase_orders::PurchaseOrderLineResponse,
            crate::services::purchase_orders::UpdatePurchaseOrderStatusRequest,
            crate::services::dashboard::DashboardMetrics,
            crate::services::dashboard::LowStockAlert,
            crate::services::dashboard::DashboardOrderSummary,
            crate::entities::purchase_order::PurchaseOrderStatus,
            crate::entities::inventory_item::InventoryStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn api_docs() -> OpenApiSpec {
    ApiDocV1::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_core_paths() {
        let openapi = api_docs();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("TableStack API"));
        assert!(json.contains("/api/v1/purchase-orders/generate"));
        assert!(json.contains("/api/v1/inventory"));
    }
}
