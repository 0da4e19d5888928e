use axum::http::StatusCode;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref REPLENISHMENT_RUNS: IntCounter = IntCounter::new(
        "replenishment_runs_total",
        "Total number of replenishment planning runs"
    )
    .expect("metric can be created");
    pub static ref REPLENISHMENT_FAILURES: IntCounter = IntCounter::new(
        "replenishment_run_failures_total",
        "Total number of failed replenishment planning runs"
    )
    .expect("metric can be created");
    pub static ref PO_CREATIONS: IntCounter = IntCounter::new(
        "purchase_order_creations_total",
        "Total number of purchase orders created"
    )
    .expect("metric can be created");
    pub static ref FORECAST_UPDATES: IntCounter = IntCounter::new(
        "forecast_updates_total",
        "Total number of per-item demand forecast refreshes"
    )
    .expect("metric can be created");
    pub static ref EVENTS_PROCESSED: IntCounter = IntCounter::new(
        "events_processed_total",
        "Total number of domain events drained from the event channel"
    )
    .expect("metric can be created");
}

/// Registers all application metrics. Safe to call more than once;
/// duplicate registrations are ignored.
pub fn register_metrics() {
    let _ = REGISTRY.register(Box::new(REPLENISHMENT_RUNS.clone()));
    let _ = REGISTRY.register(Box::new(REPLENISHMENT_FAILURES.clone()));
    let _ = REGISTRY.register(Box::new(PO_CREATIONS.clone()));
    let _ = REGISTRY.register(Box::new(FORECAST_UPDATES.clone()));
    let _ = REGISTRY.register(Box::new(EVENTS_PROCESSED.clone()));
}

/// `/metrics` endpoint exposing Prometheus text format.
pub async fn metrics_handler() -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_renders_registered_counters() {
        register_metrics();
        REPLENISHMENT_RUNS.inc();

        let body = metrics_handler().await.unwrap();
        assert!(body.contains("replenishment_runs_total"));
    }
}
