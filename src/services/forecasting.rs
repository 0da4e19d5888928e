use crate::{
    config::ForecastingConfig,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::InventoryService,
    services::orders::{HistoricalOrderLine, OrderService},
    services::stock,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A demand forecast for one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DemandForecast {
    /// Average consumption per week over the observed window.
    pub predicted_demand_per_week: Decimal,
    /// Reliability of the prediction, in [0, 1].
    pub confidence: f64,
}

/// Pluggable forecasting model. Implementations are pure: no I/O, no clock.
pub trait ForecastingStrategy: Send + Sync {
    fn forecast(&self, lines: &[HistoricalOrderLine], window_days: u32) -> DemandForecast;
}

/// Default model: a moving average of consumption over the window, with a
/// confidence score that grows with the number of distinct days observed.
pub struct MovingAverageForecaster {
    /// Distinct observation days treated as a fully dense history.
    pub dense_history_days: u32,
    /// Below this many distinct days the confidence is halved.
    pub min_observation_days: u32,
}

impl Default for MovingAverageForecaster {
    fn default() -> Self {
        Self {
            dense_history_days: 14,
            min_observation_days: 3,
        }
    }
}

impl ForecastingStrategy for MovingAverageForecaster {
    fn forecast(&self, lines: &[HistoricalOrderLine], window_days: u32) -> DemandForecast {
        let window_days = window_days.max(1);
        let total: Decimal = lines.iter().map(|line| line.quantity).sum();

        if lines.is_empty() || total <= Decimal::ZERO {
            // No sales is a valid observation, not an error.
            return DemandForecast {
                predicted_demand_per_week: Decimal::ZERO,
                confidence: 0.0,
            };
        }

        let predicted_demand_per_week =
            total / Decimal::from(window_days) * Decimal::from(7);

        let distinct_days: HashSet<_> = lines
            .iter()
            .map(|line| line.ordered_at.date_naive())
            .collect();
        let distinct_days = distinct_days.len() as f64;

        let mut confidence = (distinct_days / f64::from(self.dense_history_days)).min(1.0);
        if (distinct_days as u32) < self.min_observation_days {
            confidence /= 2.0;
        }

        DemandForecast {
            predicted_demand_per_week,
            confidence,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ForecastDemandRequest {
    /// Trailing window of order history to consider, in days. Falls back to
    /// the configured window when omitted.
    #[validate(range(min = 1, max = 365))]
    pub historical_days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub item_id: Uuid,
    pub predicted_demand_per_week: Decimal,
    pub confidence: f64,
    /// Projected date the item runs out at the forecast rate, when computable.
    pub reorder_date: Option<DateTime<Utc>>,
    pub window_days: u32,
    pub generated_at: DateTime<Utc>,
}

/// Orchestrates the forecast operation: read history, run the strategy,
/// persist the forecast onto the item.
#[derive(Clone)]
pub struct ForecastingService {
    inventory: InventoryService,
    orders: OrderService,
    strategy: Arc<dyn ForecastingStrategy>,
    config: ForecastingConfig,
    event_sender: Option<Arc<EventSender>>,
}

impl ForecastingService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        config: ForecastingConfig,
    ) -> Self {
        Self {
            inventory: InventoryService::new(db_pool.clone(), event_sender.clone()),
            orders: OrderService::new(db_pool, event_sender.clone()),
            strategy: Arc::new(MovingAverageForecaster {
                dense_history_days: config.dense_history_days,
                min_observation_days: config.min_observation_days,
            }),
            config,
            event_sender,
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn ForecastingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Recomputes and persists the demand forecast for one inventory item.
    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn forecast_demand(
        &self,
        item_id: Uuid,
        request: ForecastDemandRequest,
    ) -> Result<ForecastResponse, ServiceError> {
        request.validate()?;
        let window_days = request.historical_days.unwrap_or(self.config.window_days);

        let item = self.inventory.get_item_model(item_id).await?;

        let lines = self
            .orders
            .historical_order_lines(item.restaurant_id, item_id, window_days)
            .await?;

        let forecast = self.strategy.forecast(&lines, window_days);

        let now = Utc::now();
        let evaluation = stock::evaluate_raw(
            item.current_quantity,
            item.minimum_threshold,
            Some(forecast.predicted_demand_per_week),
        );
        let reorder_date = evaluation
            .days_until_empty
            .map(|days| now + Duration::days(days));

        self.inventory
            .update_item_prediction(
                item_id,
                forecast.predicted_demand_per_week,
                forecast.confidence,
                reorder_date,
                now,
            )
            .await?;

        crate::metrics::FORECAST_UPDATES.inc();
        info!(
            item_id = %item_id,
            predicted_demand_per_week = %forecast.predicted_demand_per_week,
            confidence = forecast.confidence,
            observations = lines.len(),
            "Demand forecast refreshed"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::ForecastUpdated {
                    item_id,
                    predicted_weekly_demand: forecast.predicted_demand_per_week,
                    confidence: forecast.confidence,
                })
                .await
            {
                warn!(error = %e, item_id = %item_id, "Failed to send forecast updated event");
            }
        }

        Ok(ForecastResponse {
            item_id,
            predicted_demand_per_week: forecast.predicted_demand_per_week,
            confidence: forecast.confidence,
            reorder_date,
            window_days,
            generated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, days_ago: i64) -> HistoricalOrderLine {
        HistoricalOrderLine {
            quantity,
            ordered_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn empty_history_yields_zero_rate_and_zero_confidence() {
        let forecaster = MovingAverageForecaster::default();
        let forecast = forecaster.forecast(&[], 14);
        assert_eq!(forecast.predicted_demand_per_week, Decimal::ZERO);
        assert_eq!(forecast.confidence, 0.0);
    }

    #[test]
    fn weekly_rate_is_total_over_window_scaled_to_seven_days() {
        let forecaster = MovingAverageForecaster::default();
        // 28 units over 14 days -> 14 per week
        let lines = vec![line(dec!(10), 1), line(dec!(10), 5), line(dec!(8), 10)];
        let forecast = forecaster.forecast(&lines, 14);
        assert_eq!(forecast.predicted_demand_per_week, dec!(14));
    }

    #[test]
    fn sparse_history_is_penalized() {
        let forecaster = MovingAverageForecaster::default();
        // Two distinct days, below the three-day minimum
        let lines = vec![line(dec!(5), 1), line(dec!(5), 4)];
        let forecast = forecaster.forecast(&lines, 14);
        assert!((forecast.confidence - (2.0 / 14.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn dense_history_reaches_full_confidence() {
        let forecaster = MovingAverageForecaster::default();
        let lines: Vec<_> = (0..14).map(|d| line(dec!(2), d)).collect();
        let forecast = forecaster.forecast(&lines, 14);
        assert_eq!(forecast.confidence, 1.0);
    }

    proptest! {
        /// Confidence never decreases as more distinct observation days are added.
        #[test]
        fn confidence_is_monotone_in_distinct_days(days in 1u32..40) {
            let forecaster = MovingAverageForecaster::default();
            let lines_a: Vec<_> = (0..days as i64).map(|d| line(dec!(1), d)).collect();
            let lines_b: Vec<_> = (0..days as i64 + 1).map(|d| line(dec!(1), d)).collect();
            let a = forecaster.forecast(&lines_a, 60);
            let b = forecaster.forecast(&lines_b, 60);
            prop_assert!(b.confidence >= a.confidence);
            prop_assert!(a.confidence >= 0.0 && a.confidence <= 1.0);
        }

        /// The weekly rate scales linearly with total quantity.
        #[test]
        fn rate_scales_with_total_quantity(qty in 1u32..1000) {
            let forecaster = MovingAverageForecaster::default();
            let lines = vec![line(Decimal::from(qty), 3)];
            let forecast = forecaster.forecast(&lines, 14);
            prop_assert_eq!(
                forecast.predicted_demand_per_week,
                Decimal::from(qty) / Decimal::from(14) * Decimal::from(7)
            );
        }
    }
}
