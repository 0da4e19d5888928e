mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use tablestack_api::entities::order::{self, OrderSource, PaymentStatus};
use tablestack_api::entities::{customer, order_item};
use tablestack_api::services::messaging::InboundMessageRequest;

#[tokio::test]
async fn recognized_message_creates_customer_and_order() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;
    app.seed_item(
        restaurant_id,
        None,
        "Margherita Pizza",
        dec!(30),
        dec!(5),
        dec!(60),
        dec!(8.50),
        None,
    )
    .await;

    let outcome = app
        .services()
        .messaging
        .process_message(InboundMessageRequest {
            restaurant_id,
            from_number: "+351912345678".into(),
            message: "2x Margherita Pizza\n1 Tiramisu @ 4.50".into(),
            thread_id: Some("wa-thread-17".into()),
        })
        .await
        .unwrap();

    assert!(outcome.success);
    let created = outcome.order.expect("order expected");
    assert_eq!(created.source, OrderSource::Whatsapp);
    assert_eq!(created.payment_status, PaymentStatus::Pending);
    assert_eq!(created.customer_name, "WhatsApp Customer");
    assert_eq!(created.customer_phone, "+351912345678");
    assert_eq!(created.items.len(), 2);

    // catalog line priced from the item catalog
    let pizza = created
        .items
        .iter()
        .find(|i| i.name == "Margherita Pizza")
        .unwrap();
    assert_eq!(pizza.quantity, dec!(2));
    assert_eq!(pizza.price, dec!(8.50));
    assert!(pizza.inventory_item_id.is_some());

    // off-catalog line keeps its inline price
    let tiramisu = created.items.iter().find(|i| i.name == "Tiramisu").unwrap();
    assert_eq!(tiramisu.quantity, dec!(1));
    assert_eq!(tiramisu.price, dec!(4.50));
    assert!(tiramisu.inventory_item_id.is_none());

    assert_eq!(created.total_amount, dec!(21.50));

    let customers = customer::Entity::find().all(&**app.db()).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "WhatsApp Customer");
    assert_eq!(customers[0].phone, "+351912345678");
    assert_eq!(created.customer_id, Some(customers[0].id));
}

#[tokio::test]
async fn named_sender_overrides_the_fallback_customer_name() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;

    let outcome = app
        .services()
        .messaging
        .process_message(InboundMessageRequest {
            restaurant_id,
            from_number: "+351911111111".into(),
            message: "name: Ana Silva\n3x Espresso @ 1.20".into(),
            thread_id: None,
        })
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.order.unwrap().customer_name, "Ana Silva");
}

#[tokio::test]
async fn unrecognized_message_writes_nothing() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;

    let outcome = app
        .services()
        .messaging
        .process_message(InboundMessageRequest {
            restaurant_id,
            from_number: "+351912345678".into(),
            message: "hello, are you open tonight?".into(),
            thread_id: None,
        })
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(
        outcome.message.as_deref(),
        Some("Message not recognized as order")
    );
    assert!(outcome.order.is_none());

    let db = &**app.db();
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(order_item::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn repeat_sender_reuses_the_customer_record() {
    let app = TestApp::new().await;
    let restaurant_id = app.seed_restaurant().await;

    for _ in 0..2 {
        app.services()
            .messaging
            .process_message(InboundMessageRequest {
                restaurant_id,
                from_number: "+351933333333".into(),
                message: "1x Espresso @ 1.20".into(),
                thread_id: None,
            })
            .await
            .unwrap();
    }

    let db = &**app.db();
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 2);
}
