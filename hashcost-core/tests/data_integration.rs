//! Integration tests for the data pipeline using the frozen fixtures:
//! cache → daily alignment → reference tables → engine → bands → eras.
//!
//! Fixture window: 2019-12-25 .. 2020-01-05. The price series has no point
//! on 2019-12-29 and the hash-rate series has two points on 2019-12-27.

use chrono::NaiveDate;
use hashcost_core::bands::select_bands;
use hashcost_core::data::{
    align_series, load_currency_rates, load_hardware_table, to_daily, CurrencyFileFormat,
    SeriesCache, SeriesKind,
};
use hashcost_core::domain::IndexRange;
use hashcost_core::eras::hardware_eras;
use hashcost_core::metrics::MetricsEngine;
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn fixture_cache() -> (tempfile::TempDir, SeriesCache) {
    let dir = tempfile::tempdir().unwrap();
    for name in ["market-price.json", "hash-rate.json"] {
        std::fs::copy(fixture_dir().join(name), dir.path().join(name)).unwrap();
    }
    let cache = SeriesCache::new(dir.path());
    (dir, cache)
}

#[test]
fn fixture_series_align_on_shared_dates() {
    let (_dir, cache) = fixture_cache();
    let prices = to_daily(&cache.load(SeriesKind::MarketPrice).unwrap()).unwrap();
    let hash_rates = to_daily(&cache.load(SeriesKind::HashRate).unwrap()).unwrap();

    assert_eq!(prices.len(), 11);
    assert_eq!(hash_rates.len(), 12);

    let aligned = align_series(&prices, &hash_rates);
    assert_eq!(aligned.len(), 11);
    assert!(aligned.dates().all(|date| date != d("2019-12-29")));
    for pair in aligned.prices.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }

    let dec_27 = aligned
        .hash_rates
        .iter()
        .find(|o| o.date == d("2019-12-27"))
        .unwrap();
    assert_eq!(dec_27.value, 1.05e8);
}

#[test]
fn fixture_tables_load() {
    let hardware = load_hardware_table(&fixture_dir().join("hardware.csv")).unwrap();
    assert_eq!(hardware.get(2019).unwrap().name, "Antminer S9");
    assert_eq!(hardware.get(2020).unwrap().th_s, 56.0);

    let rates =
        load_currency_rates(&fixture_dir().join("rates.csv"), &CurrencyFileFormat::default())
            .unwrap();
    assert!((rates.get(2019, 12).unwrap() - 62.0625).abs() < 1e-9);
    assert!((rates.get(2020, 1).unwrap() - 61.5).abs() < 1e-9);
}

#[test]
fn fixture_runs_through_engine_and_bands() {
    let (_dir, cache) = fixture_cache();
    let prices = to_daily(&cache.load(SeriesKind::MarketPrice).unwrap()).unwrap();
    let hash_rates = to_daily(&cache.load(SeriesKind::HashRate).unwrap()).unwrap();
    let aligned = align_series(&prices, &hash_rates);

    let hardware = load_hardware_table(&fixture_dir().join("hardware.csv")).unwrap();
    let rates =
        load_currency_rates(&fixture_dir().join("rates.csv"), &CurrencyFileFormat::default())
            .unwrap();

    let engine = MetricsEngine::new(&hardware, &rates);
    let records = engine
        .compute(&aligned.prices, &aligned.hash_rates)
        .unwrap();
    assert_eq!(records.len(), 11);
    assert!(records[5].total_mining_cost_usd.is_none());
    assert!(records[6].total_mining_cost_usd.is_some());

    // Smoothed total: 10 395, 9 613, 8 823, 7 977, 7 170 against prices
    // 7 195, 7 330, 7 350, 7 421, 7 900.
    let set = select_bands(&records).unwrap();
    assert_eq!(set.price_below_total_cost, vec![IndexRange::new(6, 9).unwrap()]);
    assert_eq!(set.total_cost_below_price, vec![IndexRange::new(10, 10).unwrap()]);
    assert_eq!(set.profitable[0].range, IndexRange::new(9, 10).unwrap());

    let eras = hardware_eras(&records);
    assert_eq!(eras.len(), 1);
    assert_eq!(eras[0].index, 6);
    assert_eq!(eras[0].hardware_name, "Antminer S17");
}

#[test]
fn missing_month_in_rates_is_fatal() {
    let (_dir, cache) = fixture_cache();
    let prices = to_daily(&cache.load(SeriesKind::MarketPrice).unwrap()).unwrap();
    let hash_rates = to_daily(&cache.load(SeriesKind::HashRate).unwrap()).unwrap();
    let aligned = align_series(&prices, &hash_rates);

    let hardware = load_hardware_table(&fixture_dir().join("hardware.csv")).unwrap();
    let rates = hashcost_core::reference::CurrencyRateTable::from_monthly(vec![((2019, 12), 62.0)]);

    let err = MetricsEngine::new(&hardware, &rates)
        .compute(&aligned.prices, &aligned.hash_rates)
        .unwrap_err();
    assert!(err.to_string().contains("2020-01"));
    assert!(err.to_string().contains("2020-01-01"));
}
