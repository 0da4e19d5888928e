mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use tablestack_api::entities::order::{OrderSource, OrderStatus, PaymentStatus};
use tablestack_api::services::forecasting::ForecastDemandRequest;
use tablestack_api::services::orders::{
    CreateOrderRequest, OrderLineRequest, UpdateOrderStatusRequest,
};
use uuid::Uuid;

async fn place_order(
    app: &TestApp,
    restaurant_id: Uuid,
    item_id: Uuid,
    quantity: rust_decimal::Decimal,
) -> Uuid {
    app.services()
        .orders
        .create_order(CreateOrderRequest {
            restaurant_id,
            customer_id: None,
            source: OrderSource::Website,
            items: vec![OrderLineRequest {
                name: "Tomatoes".into(),
                quantity,
                price: dec!(3.50),
                inventory_item_id: Some(item_id),
                notes: None,
                category: Some("produce".into()),
            }],
            payment_status: PaymentStatus::Paid,
            payment_method: Some("card".into()),
            customer_name: "Ana".into(),
            customer_phone: "+351900000001".into(),
            customer_address: None,
            message_thread_id: None,
        })
        .await
        .expect("order creation failed")
        .id
}

#[tokio::test]
async fn forecast_is_computed_from_order_history_and_persisted() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let item_id = app
        .seed_item(
            restaurant_id,
            None,
            "Tomatoes",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(3),
            None,
        )
        .await;

    // 14 units sold inside a 14-day window: one unit a day, 7 a week
    place_order(&app, restaurant_id, item_id, dec!(9)).await;
    place_order(&app, restaurant_id, item_id, dec!(5)).await;

    let forecast = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(14),
        })
        .await
        .unwrap();

    assert_eq!(forecast.predicted_demand_per_week, dec!(7));
    assert_eq!(forecast.window_days, 14);
    // both orders land on the same day, so confidence is penalised
    assert!(forecast.confidence > 0.0 && forecast.confidence < 0.1);
    // stock 40 at 7/week lasts into next month
    let reorder = forecast.reorder_date.expect("reorder date expected");
    assert!(reorder > forecast.generated_at);

    let item = app.services().inventory.get_item(item_id).await.unwrap();
    assert_eq!(item.predicted_demand_per_week, Some(dec!(7)));
    let stored = item.reorder_date.expect("stored reorder date expected");
    assert!((stored - reorder).num_seconds().abs() <= 1);
    assert!(item.forecast_confidence.is_some());
}

#[tokio::test]
async fn omitted_window_falls_back_to_the_configured_default() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let item_id = app
        .seed_item(
            restaurant_id,
            None,
            "Tomatoes",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(3),
            None,
        )
        .await;

    place_order(&app, restaurant_id, item_id, dec!(14)).await;

    let forecast = app
        .services()
        .forecasting
        .forecast_demand(
            item_id,
            ForecastDemandRequest {
                historical_days: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(forecast.window_days, 14);
    assert_eq!(forecast.predicted_demand_per_week, dec!(7));
}

#[tokio::test]
async fn cancelled_orders_do_not_count_as_consumption() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let item_id = app
        .seed_item(
            restaurant_id,
            None,
            "Tomatoes",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(3),
            None,
        )
        .await;

    let order_id = place_order(&app, restaurant_id, item_id, dec!(14)).await;
    app.services()
        .orders
        .update_order_status(
            order_id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Cancelled,
            },
        )
        .await
        .unwrap();

    let forecast = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(14),
        })
        .await
        .unwrap();

    assert_eq!(forecast.predicted_demand_per_week, dec!(0));
    assert_eq!(forecast.confidence, 0.0);

    // a live order alongside the cancelled one still counts alone
    place_order(&app, restaurant_id, item_id, dec!(28)).await;
    let forecast = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(14),
        })
        .await
        .unwrap();
    assert_eq!(forecast.predicted_demand_per_week, dec!(14));
}

#[tokio::test]
async fn item_without_history_forecasts_zero_demand() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let item_id = app
        .seed_item(
            restaurant_id,
            None,
            "Saffron",
            dec!(2),
            dec!(1),
            dec!(5),
            dec!(50),
            None,
        )
        .await;

    let forecast = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(30),
        })
        .await
        .unwrap();

    assert_eq!(forecast.predicted_demand_per_week, dec!(0));
    assert_eq!(forecast.confidence, 0.0);
    assert!(forecast.reorder_date.is_none());
}

#[tokio::test]
async fn lines_for_other_items_are_ignored() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let tomatoes = app
        .seed_item(
            restaurant_id,
            None,
            "Tomatoes",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(3),
            None,
        )
        .await;
    let onions = app
        .seed_item(
            restaurant_id,
            None,
            "Onions",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(2),
            None,
        )
        .await;

    place_order(&app, restaurant_id, tomatoes, dec!(28)).await;
    place_order(&app, restaurant_id, onions, dec!(100)).await;

    let forecast = app
        .services()
        .forecasting
        .forecast_demand(tomatoes, ForecastDemandRequest {
            historical_days: Some(14),
        })
        .await
        .unwrap();

    assert_eq!(forecast.predicted_demand_per_week, dec!(14));
}

#[tokio::test]
async fn window_outside_accepted_range_is_rejected() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    let item_id = app
        .seed_item(
            restaurant_id,
            None,
            "Tomatoes",
            dec!(40),
            dec!(10),
            dec!(100),
            dec!(3),
            None,
        )
        .await;

    let result = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(0),
        })
        .await;
    assert!(result.is_err());

    let result = app
        .services()
        .forecasting
        .forecast_demand(item_id, ForecastDemandRequest {
            historical_days: Some(400),
        })
        .await;
    assert!(result.is_err());
}
