//! Criterion benchmarks for hashcost hot paths.
//!
//! Benchmarks:
//! 1. Metrics engine (derive + smoothing) over multi-year daily series
//! 2. Interval detection on long sequences
//! 3. Band selection over a computed record sequence

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use hashcost_core::bands::select_bands;
use hashcost_core::domain::Observation;
use hashcost_core::intervals::find_continuous_ranges;
use hashcost_core::metrics::MetricsEngine;
use hashcost_core::reference::{CurrencyRateTable, HardwareProfile, HardwareTable};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> (Vec<Observation>, Vec<Observation>) {
    let base_date = chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let prices = (0..n)
        .map(|i| {
            let date = base_date + chrono::Duration::days(i as i64);
            Observation::new(date, 20_000.0 + (i as f64 * 0.05).sin() * 15_000.0)
        })
        .collect();
    let hash_rates = (0..n)
        .map(|i| {
            let date = base_date + chrono::Duration::days(i as i64);
            Observation::new(date, 5e7 + i as f64 * 2e5)
        })
        .collect();
    (prices, hash_rates)
}

fn make_tables() -> (HardwareTable, CurrencyRateTable) {
    let hardware = HardwareTable::from_profiles((2019..=2030).map(|year| HardwareProfile {
        year,
        name: format!("gen-{year}"),
        th_s: 14.0 * (year - 2018) as f64,
        kwt_h: 1.4 + 0.3 * (year - 2019) as f64,
        rub_kwt: 4.0,
    }))
    .unwrap();
    let rates = CurrencyRateTable::from_monthly(
        (2019..=2030).flat_map(|y| (1..=12).map(move |m| ((y, m), 70.0))),
    );
    (hardware, rates)
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_engine(c: &mut Criterion) {
    let (hardware, rates) = make_tables();
    let engine = MetricsEngine::new(&hardware, &rates);
    let mut group = c.benchmark_group("metrics_engine");
    for days in [365usize, 2555] {
        let (prices, hash_rates) = make_series(days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, _| {
            b.iter(|| engine.compute(black_box(&prices), black_box(&hash_rates)).unwrap())
        });
    }
    group.finish();
}

fn bench_intervals(c: &mut Criterion) {
    let a: Vec<f64> = (0..100_000).map(|i| (i as f64 * 0.01).sin()).collect();
    let b: Vec<f64> = (0..100_000).map(|i| (i as f64 * 0.013).cos()).collect();
    c.bench_function("find_continuous_ranges_100k", |bench| {
        bench.iter(|| find_continuous_ranges(black_box(&a), black_box(&b)).unwrap())
    });
}

fn bench_bands(c: &mut Criterion) {
    let (hardware, rates) = make_tables();
    let (prices, hash_rates) = make_series(2555);
    let records = MetricsEngine::new(&hardware, &rates)
        .compute(&prices, &hash_rates)
        .unwrap();
    c.bench_function("select_bands_7y", |b| {
        b.iter(|| select_bands(black_box(&records)).unwrap())
    });
}

criterion_group!(benches, bench_engine, bench_intervals, bench_bands);
criterion_main!(benches);
