use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use stream_outliers::{analyze, SeriesTable, Strategy, TimeWindow, WindowedTable};

/// Random-walk table with `streams` columns and `rows` one-second rows.
fn random_table(streams: usize, rows: usize) -> SeriesTable {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let columns = (0..streams)
        .map(|s| {
            let mut level: f64 = 100.0;
            let values = (0..rows)
                .map(|_| {
                    level += rng.gen_range(-1.0..1.0);
                    level
                })
                .collect();
            (format!("stream_{}", s), values)
        })
        .collect();

    SeriesTable::new(
        "created_at",
        (0..rows as i64).map(|i| origin + Duration::seconds(i)).collect(),
        columns,
    )
    .unwrap()
}

/// Full pipeline per strategy on a fixed table
fn bench_strategies(c: &mut Criterion) {
    let table = random_table(8, 10_000);
    let streams = table.streams().to_vec();
    let window = TimeWindow::covering(&table).unwrap();

    let mut group = c.benchmark_group("analyze");
    for strategy in Strategy::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &strategy, |b, s| {
            b.iter(|| analyze(black_box(*s), &table, &streams, &window, None));
        });
    }
    group.finish();
}

/// Correlation cost is quadratic in stream count
fn bench_correlation_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_streams");

    for streams in [4usize, 16, 64] {
        let table = random_table(streams, 2_000);
        let names = table.streams().to_vec();
        let window = TimeWindow::covering(&table).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(streams), &streams, |b, _| {
            b.iter(|| analyze(Strategy::Correlation, &table, black_box(&names), &window, None));
        });
    }
    group.finish();
}

/// Window slicing alone
fn bench_window_select(c: &mut Criterion) {
    let table = random_table(8, 100_000);
    let streams = table.streams().to_vec();
    let full = TimeWindow::covering(&table).unwrap();
    let window = TimeWindow::new(
        full.start + Duration::seconds(20_000),
        full.start + Duration::seconds(60_000),
    );

    c.bench_function("window_select", |b| {
        b.iter(|| WindowedTable::select(&table, black_box(&streams), &window).map(|v| v.row_count()));
    });
}

criterion_group!(
    benches,
    bench_strategies,
    bench_correlation_scaling,
    bench_window_select
);
criterion_main!(benches);
