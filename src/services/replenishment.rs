use crate::{
    config::ForecastingConfig,
    db::DbPool,
    entities::inventory_item::{self, Entity as ItemEntity, Model as ItemModel},
    entities::purchase_order::{
        ActiveModel as PoActiveModel, PurchaseOrderStatus,
    },
    entities::purchase_order_item::ActiveModel as PoItemActiveModel,
    entities::supplier::Entity as SupplierEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    services::purchase_orders::{PurchaseOrderResponse, PurchaseOrderService},
    services::stock,
};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

static ORDER_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Builds a process-unique order number: millisecond timestamp plus a
/// monotonic sequence suffix so two orders in the same millisecond never
/// collide.
fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = ORDER_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    format!("PO-{}-{:04}", millis, seq)
}

/// Registry of in-flight replenishment runs, keyed by (restaurant, supplier).
/// Holding a [`ReplenishmentGuard`] excludes a second run for the same pair.
#[derive(Clone, Default)]
pub struct ReplenishmentLocks {
    inner: Arc<DashMap<(Uuid, Uuid), ()>>,
}

pub struct ReplenishmentGuard {
    locks: Arc<DashMap<(Uuid, Uuid), ()>>,
    key: (Uuid, Uuid),
}

impl ReplenishmentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim the pair; None when a run is already in flight.
    pub fn try_acquire(
        &self,
        restaurant_id: Uuid,
        supplier_id: Uuid,
    ) -> Option<ReplenishmentGuard> {
        let key = (restaurant_id, supplier_id);
        // DashMap entry API gives atomic check-and-insert
        match self.inner.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(());
                Some(ReplenishmentGuard {
                    locks: self.inner.clone(),
                    key,
                })
            }
        }
    }
}

impl Drop for ReplenishmentGuard {
    fn drop(&mut self) {
        self.locks.remove(&self.key);
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratePurchaseOrderRequest {
    pub restaurant_id: Uuid,
    pub supplier_id: Uuid,
    /// When true the order is tagged ai_generated and carries a reasoning
    /// summary; when false it is created as a draft.
    #[serde(default)]
    pub auto_generate: bool,
}

/// Outcome of a planning run. A run that finds nothing to reorder is a
/// successful no-op, not an error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplenishmentOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<PurchaseOrderResponse>,
}

#[derive(Debug)]
struct PlannedLine {
    item: ItemModel,
    ordered_quantity: Decimal,
    line_total: Decimal,
    weekly_rate: Decimal,
}

/// The replenishment planner: turns low-stock items for one supplier into a
/// single purchase order.
#[derive(Clone)]
pub struct ReplenishmentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    locks: ReplenishmentLocks,
    config: ForecastingConfig,
}

impl ReplenishmentService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        locks: ReplenishmentLocks,
        config: ForecastingConfig,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            locks,
            config,
        }
    }

    /// Exposed for coordination tests.
    pub fn locks(&self) -> &ReplenishmentLocks {
        &self.locks
    }

    /// Plans and persists one purchase order for every active item of the
    /// (restaurant, supplier) pair that is at or below its minimum
    /// threshold. Exactly one order is written per successful call; when no
    /// item qualifies, nothing is written.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id, supplier_id = %request.supplier_id))]
    pub async fn generate_purchase_order(
        &self,
        request: GeneratePurchaseOrderRequest,
    ) -> Result<ReplenishmentOutcome, ServiceError> {
        crate::metrics::REPLENISHMENT_RUNS.inc();

        let _guard = self
            .locks
            .try_acquire(request.restaurant_id, request.supplier_id)
            .ok_or_else(|| {
                warn!("Replenishment already running for this restaurant and supplier");
                ServiceError::Conflict(
                    "A replenishment run for this supplier is already in progress".into(),
                )
            })?;

        let db = &*self.db_pool;

        let supplier = SupplierEntity::find_by_id(request.supplier_id)
            .one(db)
            .await
            .map_err(ServiceError::from)?
            .filter(|s| s.restaurant_id == request.restaurant_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", request.supplier_id))
            })?;

        let items = ItemEntity::find()
            .filter(inventory_item::Column::RestaurantId.eq(request.restaurant_id))
            .filter(inventory_item::Column::SupplierId.eq(request.supplier_id))
            .filter(inventory_item::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::from)?;

        let coverage_weeks = Decimal::from(self.config.coverage_weeks);
        let lines: Vec<PlannedLine> = items
            .into_iter()
            .filter(|item| stock::evaluate(item).needs_reorder)
            .map(|item| plan_line(item, coverage_weeks))
            .collect();

        if lines.is_empty() {
            info!("No items need reordering; nothing written");
            return Ok(ReplenishmentOutcome {
                success: false,
                message: Some("no items need reordering".into()),
                purchase_order: None,
            });
        }

        let total_amount: Decimal = lines.iter().map(|line| line.line_total).sum();
        let ai_reasoning = request.auto_generate.then(|| build_reasoning(&lines));
        let status = if request.auto_generate {
            PurchaseOrderStatus::AiGenerated
        } else {
            PurchaseOrderStatus::Draft
        };

        let now = Utc::now();
        let po_id = Uuid::new_v4();
        let order_number = generate_order_number();
        let expected_delivery = now + Duration::days(self.config.lead_time_days as i64);

        let txn = db.begin().await.map_err(|e| {
            crate::metrics::REPLENISHMENT_FAILURES.inc();
            error!(error = %e, "Failed to start replenishment transaction");
            ServiceError::from(e)
        })?;

        let po = PoActiveModel {
            id: Set(po_id),
            restaurant_id: Set(request.restaurant_id),
            supplier_id: Set(supplier.id),
            order_number: Set(order_number.clone()),
            status: Set(status),
            total_amount: Set(total_amount),
            ai_generated: Set(request.auto_generate),
            ai_reasoning: Set(ai_reasoning),
            expected_delivery: Set(expected_delivery),
            actual_delivery: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let po_model = po.insert(&txn).await.map_err(|e| {
            crate::metrics::REPLENISHMENT_FAILURES.inc();
            error!(error = %e, order_number = %order_number, "Failed to insert purchase order");
            ServiceError::from(e)
        })?;

        for line in &lines {
            let po_item = PoItemActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(po_id),
                inventory_item_id: Set(line.item.id),
                item_name: Set(line.item.name.clone()),
                quantity: Set(line.ordered_quantity),
                unit_price: Set(line.item.cost_per_unit),
                total_price: Set(line.line_total),
                created_at: Set(now),
            };
            po_item.insert(&txn).await.map_err(|e| {
                crate::metrics::REPLENISHMENT_FAILURES.inc();
                error!(error = %e, item_id = %line.item.id, "Failed to insert purchase order line");
                ServiceError::from(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            crate::metrics::REPLENISHMENT_FAILURES.inc();
            error!(error = %e, "Failed to commit replenishment transaction");
            ServiceError::from(e)
        })?;

        crate::metrics::PO_CREATIONS.inc();
        info!(
            purchase_order_id = %po_id,
            order_number = %order_number,
            line_count = lines.len(),
            %total_amount,
            "Purchase order generated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::PurchaseOrderCreated {
                    purchase_order_id: po_id,
                    restaurant_id: request.restaurant_id,
                    supplier_id: supplier.id,
                    total_amount,
                })
                .await
            {
                warn!(error = %e, purchase_order_id = %po_id, "Failed to send purchase order created event");
            }
        }

        let po_service = PurchaseOrderService::new(self.db_pool.clone(), None);
        let response = po_service.get_purchase_order(po_model.id).await?;

        Ok(ReplenishmentOutcome {
            success: true,
            message: None,
            purchase_order: Some(response),
        })
    }
}

/// Quantity rule: order enough to refill to the maximum threshold or to
/// cover the next two weeks of forecast demand, whichever is larger.
fn ordered_quantity(item: &ItemModel, coverage_weeks: Decimal) -> Decimal {
    let optimal = (item.maximum_threshold - item.current_quantity).max(Decimal::ZERO);
    let weekly_rate = item
        .predicted_demand_per_week
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    let forecast_term = weekly_rate * coverage_weeks;
    optimal.max(forecast_term)
}

fn plan_line(item: ItemModel, coverage_weeks: Decimal) -> PlannedLine {
    let ordered = ordered_quantity(&item, coverage_weeks);
    let weekly_rate = item
        .predicted_demand_per_week
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    PlannedLine {
        line_total: ordered * item.cost_per_unit,
        ordered_quantity: ordered,
        weekly_rate,
        item,
    }
}

fn build_reasoning(lines: &[PlannedLine]) -> String {
    let mut reasoning = String::from("AI-generated purchase order based on:\n");
    for line in lines {
        reasoning.push_str(&format!(
            "- {}: {}{} (current: {}, predicted demand: {}/week)\n",
            line.item.name,
            line.ordered_quantity,
            line.item.unit,
            line.item.current_quantity,
            line.weekly_rate,
        ));
    }
    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::inventory_item::InventoryStatus;
    use rust_decimal_macros::dec;

    fn plan_line_2(item: ItemModel) -> PlannedLine {
        plan_line(item, dec!(2))
    }

    fn item(
        current: Decimal,
        minimum: Decimal,
        maximum: Decimal,
        cost: Decimal,
        rate: Option<Decimal>,
    ) -> ItemModel {
        let now = Utc::now();
        ItemModel {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            name: "Tomatoes".into(),
            category: "produce".into(),
            unit: "kg".into(),
            current_quantity: current,
            minimum_threshold: minimum,
            maximum_threshold: maximum,
            cost_per_unit: cost,
            supplier_id: Some(Uuid::new_v4()),
            last_restocked: None,
            expiry_date: None,
            status: InventoryStatus::from_quantity(current, minimum),
            predicted_demand_per_week: rate,
            forecast_confidence: rate.map(|_| 0.7),
            reorder_date: None,
            forecast_generated_at: None,
            is_active: true,
            last_updated: now,
            created_at: now,
        }
    }

    #[test]
    fn quantity_rule_refill_dominates() {
        // current 10, max 100, rate 14/week: optimal 90 vs forecast term 28
        let item = item(dec!(10), dec!(20), dec!(100), dec!(5), Some(dec!(14)));
        assert_eq!(ordered_quantity(&item, dec!(2)), dec!(90));
        let planned = plan_line(item, dec!(2));
        assert_eq!(planned.line_total, dec!(450));
    }

    #[test]
    fn quantity_rule_forecast_dominates_with_low_ceiling() {
        // same item but max 50: optimal 40 vs forecast term 28 -> 40
        let item = item(dec!(10), dec!(20), dec!(50), dec!(5), Some(dec!(14)));
        assert_eq!(ordered_quantity(&item, dec!(2)), dec!(40));

        // with a higher rate the forecast term wins: 25*2 = 50 > 40
        let item = item_with_rate(dec!(25));
        assert_eq!(ordered_quantity(&item, dec!(2)), dec!(50));
    }

    fn item_with_rate(rate: Decimal) -> ItemModel {
        item(dec!(10), dec!(20), dec!(50), dec!(5), Some(rate))
    }

    #[test]
    fn overfull_item_clamps_refill_term_to_zero() {
        // current above max: refill term clamps to 0, forecast term carries
        let item = item(dec!(120), dec!(20), dec!(100), dec!(5), Some(dec!(4)));
        assert_eq!(ordered_quantity(&item, dec!(2)), dec!(8));
    }

    #[test]
    fn missing_forecast_means_refill_only() {
        let item = item(dec!(10), dec!(20), dec!(100), dec!(5), None);
        assert_eq!(ordered_quantity(&item, dec!(2)), dec!(90));
    }

    #[test]
    fn total_is_exact_sum_of_line_totals() {
        let lines: Vec<PlannedLine> = vec![
            plan_line_2(item(dec!(10), dec!(20), dec!(100), dec!(0.10), None)),
            plan_line_2(item(dec!(5), dec!(20), dec!(50), dec!(0.20), None)),
        ];
        let total: Decimal = lines.iter().map(|l| l.line_total).sum();
        // 90 * 0.10 + 45 * 0.20 = 9.00 + 9.00
        assert_eq!(total, dec!(18.00));
    }

    #[test]
    fn reasoning_lists_each_item_with_rate() {
        let lines = vec![plan_line_2(item(
            dec!(10),
            dec!(20),
            dec!(100),
            dec!(5),
            Some(dec!(14)),
        ))];
        let reasoning = build_reasoning(&lines);
        assert!(reasoning.starts_with("AI-generated purchase order based on:\n"));
        assert!(reasoning
            .contains("- Tomatoes: 90kg (current: 10, predicted demand: 14/week)"));
    }

    #[test]
    fn order_numbers_are_unique_within_a_burst() {
        let numbers: Vec<String> = (0..64).map(|_| generate_order_number()).collect();
        let unique: std::collections::HashSet<_> = numbers.iter().collect();
        assert_eq!(unique.len(), numbers.len());
        assert!(numbers.iter().all(|n| n.starts_with("PO-")));
    }

    #[test]
    fn lock_excludes_second_acquisition_until_released() {
        let locks = ReplenishmentLocks::new();
        let restaurant_id = Uuid::new_v4();
        let supplier_id = Uuid::new_v4();

        let guard = locks.try_acquire(restaurant_id, supplier_id);
        assert!(guard.is_some());
        assert!(locks.try_acquire(restaurant_id, supplier_id).is_none());

        // A different supplier is unaffected
        assert!(locks.try_acquire(restaurant_id, Uuid::new_v4()).is_some());

        drop(guard);
        assert!(locks.try_acquire(restaurant_id, supplier_id).is_some());
    }
}
