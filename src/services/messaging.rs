use crate::{
    db::DbPool,
    entities::inventory_item::{self, Entity as ItemEntity},
    entities::order::{OrderSource, PaymentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    services::customers::CustomerService,
    services::orders::{CreateOrderRequest, OrderLineRequest, OrderResponse, OrderService},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

const FALLBACK_CUSTOMER_NAME: &str = "WhatsApp Customer";

/// One line extracted from an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub name: String,
    pub quantity: Decimal,
    /// Price stated inline in the message, when the sender gave one.
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOrder {
    pub customer_name: Option<String>,
    pub lines: Vec<ParsedLine>,
}

/// Extracts order intent from free text. Returns None when the message is
/// not an order. The default is a deterministic keyword parser; an
/// LLM-backed strategy can replace it without touching the pipeline.
pub trait TextUnderstandingStrategy: Send + Sync {
    fn parse(&self, message: &str) -> Option<ParsedOrder>;
}

/// Line-oriented parser. A line is an order line when it starts with a
/// quantity: `2x Margherita`, `2 x Margherita`, or `2 Margherita`, with an
/// optional inline price suffix `@ 12.50`. A `name: <who>` line sets the
/// customer name. A message with no order lines is not an order.
pub struct KeywordOrderParser;

impl KeywordOrderParser {
    fn parse_line(line: &str) -> Option<ParsedLine> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (qty_part, rest) = line.split_once(|c: char| c.is_whitespace())?;
        let qty_part = qty_part.trim_end_matches(['x', 'X']);
        let quantity = Decimal::from_str(qty_part).ok()?;
        if quantity <= Decimal::ZERO {
            return None;
        }

        // strip a leading "x " left over from the "2 x name" form
        let rest = rest
            .trim()
            .strip_prefix("x ")
            .or_else(|| rest.trim().strip_prefix("X "))
            .unwrap_or(rest.trim());

        let (name, price) = match rest.split_once('@') {
            Some((name, price_text)) => {
                (name.trim(), Decimal::from_str(price_text.trim()).ok())
            }
            None => (rest, None),
        };
        if name.is_empty() {
            return None;
        }

        Some(ParsedLine {
            name: name.to_string(),
            quantity,
            price,
        })
    }
}

impl TextUnderstandingStrategy for KeywordOrderParser {
    fn parse(&self, message: &str) -> Option<ParsedOrder> {
        let mut customer_name = None;
        let mut lines = Vec::new();

        for raw in message.lines() {
            let raw = raw.trim();
            if let Some(rest) = raw
                .strip_prefix("name:")
                .or_else(|| raw.strip_prefix("Name:"))
            {
                let rest = rest.trim();
                if !rest.is_empty() {
                    customer_name = Some(rest.to_string());
                }
                continue;
            }
            if let Some(line) = Self::parse_line(raw) {
                lines.push(line);
            }
        }

        if lines.is_empty() {
            None
        } else {
            Some(ParsedOrder {
                customer_name,
                lines,
            })
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InboundMessageRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 5, max = 32, message = "Sender phone must be between 5 and 32 characters"))]
    pub from_number: String,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
    pub thread_id: Option<String>,
}

/// Outcome of processing one inbound message. An unrecognized message is a
/// negative result, not an error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InboundMessageOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderResponse>,
}

#[derive(Clone)]
pub struct MessagingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    orders: OrderService,
    customers: CustomerService,
    parser: Arc<dyn TextUnderstandingStrategy>,
}

impl MessagingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            orders: OrderService::new(db_pool.clone(), event_sender.clone()),
            customers: CustomerService::new(db_pool.clone(), None),
            db_pool,
            event_sender,
            parser: Arc::new(KeywordOrderParser),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn TextUnderstandingStrategy>) -> Self {
        self.parser = parser;
        self
    }

    /// Runs one inbound message through the pipeline: parse, resolve the
    /// customer by phone, price the lines against the item catalog, create
    /// the order. An unrecognized message writes nothing.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn process_message(
        &self,
        request: InboundMessageRequest,
    ) -> Result<InboundMessageOutcome, ServiceError> {
        request.validate()?;

        let parsed = match self.parser.parse(&request.message) {
            Some(parsed) => parsed,
            None => {
                info!("Inbound message not recognized as order");
                return Ok(InboundMessageOutcome {
                    success: false,
                    message: Some("Message not recognized as order".into()),
                    order: None,
                });
            }
        };

        let customer_name = parsed
            .customer_name
            .clone()
            .unwrap_or_else(|| FALLBACK_CUSTOMER_NAME.to_string());
        let customer = self
            .customers
            .find_or_create_by_phone(request.restaurant_id, &request.from_number, &customer_name)
            .await?;

        let items = self.price_lines(request.restaurant_id, &parsed.lines).await?;
        let order = self
            .orders
            .create_order(CreateOrderRequest {
                restaurant_id: request.restaurant_id,
                customer_id: Some(customer.id),
                source: OrderSource::Whatsapp,
                items,
                payment_status: PaymentStatus::Pending,
                payment_method: None,
                customer_name,
                customer_phone: request.from_number,
                customer_address: None,
                message_thread_id: request.thread_id,
            })
            .await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::InboundMessageProcessed {
                    restaurant_id: request.restaurant_id,
                    order_id: Some(order.id),
                })
                .await
            {
                warn!(error = %e, order_id = %order.id, "Failed to send inbound message event");
            }
        }

        Ok(InboundMessageOutcome {
            success: true,
            message: None,
            order: Some(order),
        })
    }

    /// Resolves each parsed line against the active item catalog by
    /// case-insensitive name match. A matched line takes the catalog price
    /// and item link; an unmatched line keeps its inline price, or zero.
    async fn price_lines(
        &self,
        restaurant_id: Uuid,
        lines: &[ParsedLine],
    ) -> Result<Vec<OrderLineRequest>, ServiceError> {
        let db = &*self.db_pool;
        let catalog = ItemEntity::find()
            .filter(inventory_item::Column::RestaurantId.eq(restaurant_id))
            .filter(inventory_item::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        Ok(lines
            .iter()
            .map(|line| {
                let matched = catalog
                    .iter()
                    .find(|item| item.name.eq_ignore_ascii_case(&line.name));
                match matched {
                    Some(item) => OrderLineRequest {
                        name: item.name.clone(),
                        quantity: line.quantity,
                        price: line.price.unwrap_or(item.cost_per_unit),
                        inventory_item_id: Some(item.id),
                        notes: None,
                        category: Some(item.category.clone()),
                    },
                    None => OrderLineRequest {
                        name: line.name.clone(),
                        quantity: line.quantity,
                        price: line.price.unwrap_or(Decimal::ZERO),
                        inventory_item_id: None,
                        notes: None,
                        category: None,
                    },
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(message: &str) -> Option<ParsedOrder> {
        KeywordOrderParser.parse(message)
    }

    #[test]
    fn parses_quantity_prefix_forms() {
        let parsed = parse("2x Margherita\n1 Tiramisu\n3 x Cola").unwrap();
        assert_eq!(parsed.lines.len(), 3);
        assert_eq!(parsed.lines[0], ParsedLine {
            name: "Margherita".into(),
            quantity: dec!(2),
            price: None,
        });
        assert_eq!(parsed.lines[1].name, "Tiramisu");
        assert_eq!(parsed.lines[2].name, "Cola");
        assert_eq!(parsed.lines[2].quantity, dec!(3));
    }

    #[test]
    fn parses_inline_price_and_customer_name() {
        let parsed = parse("name: Ana\n2x Margherita @ 12.50").unwrap();
        assert_eq!(parsed.customer_name.as_deref(), Some("Ana"));
        assert_eq!(parsed.lines[0].price, Some(dec!(12.50)));
    }

    #[test]
    fn greeting_is_not_an_order() {
        assert!(parse("hola, are you open tonight?").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn zero_or_negative_quantity_lines_are_ignored() {
        assert!(parse("0x Margherita").is_none());
        assert!(parse("-2 Margherita").is_none());
    }
}
