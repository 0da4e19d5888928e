use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::inventory_item::Model as InventoryItemModel;

/// Result of evaluating one inventory item's stock position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockEvaluation {
    /// True when the item is at or below its minimum threshold.
    pub needs_reorder: bool,
    /// Whole days of stock remaining at the forecast consumption rate.
    /// None when there is no forecast or the rate is zero.
    pub days_until_empty: Option<i64>,
}

/// Evaluates an item's stock position. Pure and deterministic: same inputs,
/// same output, no I/O and no clock access.
pub fn evaluate(item: &InventoryItemModel) -> StockEvaluation {
    evaluate_raw(
        item.current_quantity,
        item.minimum_threshold,
        item.predicted_demand_per_week,
    )
}

/// Field-level form of [`evaluate`], usable before an item is persisted.
pub fn evaluate_raw(
    current_quantity: Decimal,
    minimum_threshold: Decimal,
    predicted_demand_per_week: Option<Decimal>,
) -> StockEvaluation {
    let needs_reorder = current_quantity <= minimum_threshold;

    let days_until_empty = predicted_demand_per_week
        .filter(|rate| *rate > Decimal::ZERO)
        .and_then(|rate| {
            // floor(current / weekly_rate * 7), whole days
            (current_quantity / rate * Decimal::from(7)).floor().to_i64()
        });

    StockEvaluation {
        needs_reorder,
        days_until_empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eval(current: Decimal, minimum: Decimal, rate: Option<Decimal>) -> StockEvaluation {
        evaluate_raw(current, minimum, rate)
    }

    #[test]
    fn reorder_exactly_at_threshold() {
        assert!(eval(dec!(20), dec!(20), None).needs_reorder);
        assert!(eval(dec!(19.99), dec!(20), None).needs_reorder);
        assert!(!eval(dec!(20.01), dec!(20), None).needs_reorder);
    }

    #[test]
    fn days_until_empty_is_floored_whole_days() {
        // 10 units at 14/week: 10/14*7 = 5.0 exactly
        assert_eq!(
            eval(dec!(10), dec!(20), Some(dec!(14))).days_until_empty,
            Some(5)
        );
        // 10 units at 3/week: 10/3*7 = 23.33.. -> 23
        assert_eq!(
            eval(dec!(10), dec!(20), Some(dec!(3))).days_until_empty,
            Some(23)
        );
    }

    #[test]
    fn days_until_empty_none_without_forecast_or_rate() {
        assert_eq!(eval(dec!(10), dec!(20), None).days_until_empty, None);
        assert_eq!(
            eval(dec!(10), dec!(20), Some(dec!(0))).days_until_empty,
            None
        );
    }

    #[test]
    fn zero_stock_is_zero_days() {
        assert_eq!(
            eval(dec!(0), dec!(20), Some(dec!(14))).days_until_empty,
            Some(0)
        );
    }

    #[test]
    fn documented_example_low_stock_item() {
        let result = eval(dec!(10), dec!(20), Some(dec!(14)));
        assert!(result.needs_reorder);
        assert_eq!(result.days_until_empty, Some(5));
    }
}
