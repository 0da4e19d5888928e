use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Domain events emitted by services after a successful state change.
/// Consumers run out-of-band; emission failures never fail the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Inventory events
    InventoryItemCreated(Uuid),
    InventoryAdjusted {
        item_id: Uuid,
        old_quantity: Decimal,
        new_quantity: Decimal,
    },
    InventoryLow {
        item_id: Uuid,
        restaurant_id: Uuid,
        current_quantity: Decimal,
        minimum_threshold: Decimal,
    },
    ForecastUpdated {
        item_id: Uuid,
        predicted_weekly_demand: Decimal,
        confidence: f64,
    },

    // Procurement events
    PurchaseOrderCreated {
        purchase_order_id: Uuid,
        restaurant_id: Uuid,
        supplier_id: Uuid,
        total_amount: Decimal,
    },
    PurchaseOrderStatusChanged {
        purchase_order_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // CRM events
    CustomerCreated {
        customer_id: Uuid,
        restaurant_id: Uuid,
    },
    CampaignCreated {
        campaign_id: Uuid,
        restaurant_id: Uuid,
    },
    JobApplicationReceived {
        application_id: Uuid,
        job_posting_id: Uuid,
        restaurant_id: Uuid,
    },

    // Messaging events
    InboundMessageProcessed {
        restaurant_id: Uuid,
        order_id: Option<Uuid>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates the event channel wired between services and the processing loop.
pub fn create_event_channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Runs until all senders drop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        crate::metrics::EVENTS_PROCESSED.inc();
        match &event {
            Event::InventoryLow {
                item_id,
                restaurant_id,
                current_quantity,
                minimum_threshold,
            } => {
                warn!(
                    %item_id,
                    %restaurant_id,
                    %current_quantity,
                    %minimum_threshold,
                    "Inventory item at or below minimum threshold"
                );
            }
            Event::PurchaseOrderCreated {
                purchase_order_id,
                restaurant_id,
                supplier_id,
                total_amount,
            } => {
                info!(
                    %purchase_order_id,
                    %restaurant_id,
                    %supplier_id,
                    %total_amount,
                    "Purchase order created"
                );
            }
            other => debug!("Processed event: {:?}", other),
        }
    }

    info!("Event processing loop terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn events_flow_through_channel() {
        let (sender, mut rx) = create_event_channel(8);

        sender
            .send(Event::InventoryAdjusted {
                item_id: Uuid::new_v4(),
                old_quantity: dec!(10),
                new_quantity: dec!(4),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::InventoryAdjusted {
                old_quantity,
                new_quantity,
                ..
            }) => {
                assert_eq!(old_quantity, dec!(10));
                assert_eq!(new_quantity, dec!(4));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_drops() {
        let (sender, rx) = create_event_channel(1);
        drop(rx);
        assert!(sender
            .send(Event::CustomerCreated {
                customer_id: Uuid::new_v4(),
                restaurant_id: Uuid::new_v4(),
            })
            .await
            .is_err());
    }
}
