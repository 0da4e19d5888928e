mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use tablestack_api::entities::purchase_order::{self, PurchaseOrderStatus};
use tablestack_api::entities::purchase_order_item;
use tablestack_api::errors::ServiceError;
use tablestack_api::services::replenishment::GeneratePurchaseOrderRequest;

#[tokio::test]
async fn generates_ai_purchase_order_for_low_stock_item() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let supplier_id = app.seed_supplier(restaurant_id).await;

    // current 10 <= min 20, refill to max 100 beats two weeks of demand (28)
    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Tomatoes",
        dec!(10),
        dec!(20),
        dec!(100),
        dec!(5),
        Some(dec!(14)),
    )
    .await;

    let outcome = app
        .services()
        .replenishment
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: true,
        })
        .await
        .expect("replenishment run failed");

    assert!(outcome.success);
    let po = outcome.purchase_order.expect("purchase order expected");
    assert_eq!(po.status, PurchaseOrderStatus::AiGenerated);
    assert!(po.ai_generated);
    assert!(po.order_number.starts_with("PO-"));
    assert_eq!(po.items.len(), 1);
    assert_eq!(po.items[0].quantity, dec!(90));
    assert_eq!(po.items[0].unit_price, dec!(5));
    assert_eq!(po.items[0].total_price, dec!(450));
    assert_eq!(po.total_amount, dec!(450));

    let reasoning = po.ai_reasoning.expect("reasoning expected");
    assert!(reasoning.starts_with("AI-generated purchase order based on:"));
    assert!(reasoning.contains("Tomatoes"));
    assert!(reasoning.contains("predicted demand: 14/week"));

    // lead time default is 3 days
    let lead = po.expected_delivery - po.created_at;
    assert_eq!(lead.num_days(), 3);
}

#[tokio::test]
async fn forecast_coverage_is_bounded_by_low_maximum_threshold() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let supplier_id = app.seed_supplier(restaurant_id).await;

    // refill term 50 - 10 = 40 beats forecast term 14 * 2 = 28
    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Basil",
        dec!(10),
        dec!(20),
        dec!(50),
        dec!(5),
        Some(dec!(14)),
    )
    .await;

    let outcome = app
        .services()
        .replenishment
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: true,
        })
        .await
        .unwrap();

    let po = outcome.purchase_order.unwrap();
    assert_eq!(po.items[0].quantity, dec!(40));
    assert_eq!(po.total_amount, dec!(200));
}

#[tokio::test]
async fn run_with_nothing_to_reorder_writes_no_rows() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let supplier_id = app.seed_supplier(restaurant_id).await;

    // comfortably above the minimum threshold
    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Olive Oil",
        dec!(80),
        dec!(20),
        dec!(100),
        dec!(9),
        None,
    )
    .await;

    let outcome = app
        .services()
        .replenishment
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: true,
        })
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("no items need reordering"));
    assert!(outcome.purchase_order.is_none());

    let po_count = purchase_order::Entity::find()
        .count(&**app.db())
        .await
        .unwrap();
    let line_count = purchase_order_item::Entity::find()
        .count(&**app.db())
        .await
        .unwrap();
    assert_eq!(po_count, 0);
    assert_eq!(line_count, 0);
}

#[tokio::test]
async fn only_low_stock_items_of_the_supplier_are_included() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let supplier_id = app.seed_supplier(restaurant_id).await;
    let other_supplier = app.seed_supplier(restaurant_id).await;

    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Tomatoes",
        dec!(10),
        dec!(20),
        dec!(100),
        dec!(0.10),
        None,
    )
    .await;
    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Onions",
        dec!(5),
        dec!(20),
        dec!(50),
        dec!(0.20),
        None,
    )
    .await;
    // healthy stock, same supplier
    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Garlic",
        dec!(40),
        dec!(10),
        dec!(60),
        dec!(1),
        None,
    )
    .await;
    // low stock but different supplier
    app.seed_item(
        restaurant_id,
        Some(other_supplier),
        "Flour",
        dec!(1),
        dec!(20),
        dec!(100),
        dec!(2),
        None,
    )
    .await;

    let outcome = app
        .services()
        .replenishment
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: false,
        })
        .await
        .unwrap();

    let po = outcome.purchase_order.unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Draft);
    assert!(!po.ai_generated);
    assert!(po.ai_reasoning.is_none());

    let mut names: Vec<&str> = po.items.iter().map(|i| i.item_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Onions", "Tomatoes"]);

    // 90 * 0.10 + 45 * 0.20 = 18.00, exact decimal arithmetic
    assert_eq!(po.total_amount, dec!(18.00));
}

#[tokio::test]
async fn concurrent_run_for_same_pair_is_rejected() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let supplier_id = app.seed_supplier(restaurant_id).await;

    app.seed_item(
        restaurant_id,
        Some(supplier_id),
        "Tomatoes",
        dec!(10),
        dec!(20),
        dec!(100),
        dec!(5),
        None,
    )
    .await;

    let service = &app.services().replenishment;
    let _guard = service
        .locks()
        .try_acquire(restaurant_id, supplier_id)
        .expect("lock should be free");

    let result = service
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: true,
        })
        .await;

    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    // nothing was written while the pair was locked
    let po_count = purchase_order::Entity::find()
        .count(&**app.db())
        .await
        .unwrap();
    assert_eq!(po_count, 0);

    drop(_guard);
    let outcome = service
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id,
            auto_generate: true,
        })
        .await
        .unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn unknown_supplier_is_not_found() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;

    let result = app
        .services()
        .replenishment
        .generate_purchase_order(GeneratePurchaseOrderRequest {
            restaurant_id,
            supplier_id: uuid::Uuid::new_v4(),
            auto_generate: true,
        })
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
