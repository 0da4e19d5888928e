use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use tablestack_api::services::forecasting::{ForecastingStrategy, MovingAverageForecaster};
use tablestack_api::services::messaging::{KeywordOrderParser, TextUnderstandingStrategy};
use tablestack_api::services::orders::HistoricalOrderLine;
use tablestack_api::services::stock;

fn bench_stock_evaluation(c: &mut Criterion) {
    c.bench_function("stock_evaluate_raw", |b| {
        b.iter(|| {
            stock::evaluate_raw(
                black_box(dec!(37.5)),
                black_box(dec!(20)),
                black_box(Some(dec!(14))),
            )
        })
    });
}

fn bench_moving_average_forecast(c: &mut Criterion) {
    let now = Utc::now();
    let lines: Vec<HistoricalOrderLine> = (0..90)
        .map(|i| HistoricalOrderLine {
            quantity: dec!(2.5),
            ordered_at: now - Duration::days(i % 30),
        })
        .collect();
    let forecaster = MovingAverageForecaster::default();

    c.bench_function("moving_average_forecast_90_lines", |b| {
        b.iter(|| forecaster.forecast(black_box(&lines), black_box(30)))
    });
}

fn bench_message_parsing(c: &mut Criterion) {
    let message = "name: Ana Silva\n\
                   2x Margherita Pizza\n\
                   1 Tiramisu @ 4.50\n\
                   3 x Espresso @ 1.20\n\
                   please ring the bell";

    c.bench_function("keyword_order_parse", |b| {
        b.iter(|| KeywordOrderParser.parse(black_box(message)))
    });
}

criterion_group!(
    benches,
    bench_stock_evaluation,
    bench_moving_average_forecast,
    bench_message_parsing
);
criterion_main!(benches);
