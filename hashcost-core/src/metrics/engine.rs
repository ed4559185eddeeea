//! Metrics engine: joins price and hash-rate series with the reference tables
//! and the halving schedule, derives per-day mining costs, then smooths them.

use super::rolling::rolling_mean;
use crate::domain::{DailyRecord, Observation};
use crate::halving::block_reward;
use crate::reference::{CurrencyRateTable, HardwareTable};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const HOURS_PER_DAY: f64 = 24.0;

/// Fixed economic assumptions of the cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Expected blocks mined per day.
    pub blocks_per_day: f64,
    /// Baseline electricity cost in USD per kWh.
    pub electricity_usd_per_kwh: f64,
    /// Share of total operating cost taken by electricity.
    pub electricity_cost_share: f64,
    /// Trailing window for the smoothing pass, in days.
    pub smoothing_window: usize,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            blocks_per_day: 144.0,
            electricity_usd_per_kwh: 0.05,
            electricity_cost_share: 0.6,
            smoothing_window: 7,
        }
    }
}

impl CostModel {
    pub fn validate(&self) -> Result<(), MetricsError> {
        if !(self.blocks_per_day.is_finite() && self.blocks_per_day > 0.0) {
            return Err(MetricsError::InvalidCostModel(
                "blocks_per_day must be positive".into(),
            ));
        }
        if !(self.electricity_usd_per_kwh.is_finite() && self.electricity_usd_per_kwh >= 0.0) {
            return Err(MetricsError::InvalidCostModel(
                "electricity_usd_per_kwh must be non-negative".into(),
            ));
        }
        if !(self.electricity_cost_share > 0.0 && self.electricity_cost_share <= 1.0) {
            return Err(MetricsError::InvalidCostModel(
                "electricity_cost_share must be in (0, 1]".into(),
            ));
        }
        if self.smoothing_window == 0 {
            return Err(MetricsError::InvalidCostModel(
                "smoothing_window must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Fatal errors raised while building the record sequence.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("no hardware profile for year {year} (needed by {date})")]
    MissingHardware { date: NaiveDate, year: i32 },

    #[error("no currency rate for {year}-{month:02} (needed by {date})")]
    MissingCurrencyRate {
        date: NaiveDate,
        year: i32,
        month: u32,
    },

    #[error("hash rate must be positive on {date}, got {value}")]
    NonPositiveHashRate { date: NaiveDate, value: f64 },

    #[error("{field} is not finite on {date}: {value}")]
    NonFinite {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("series length mismatch: {prices} prices vs {hash_rates} hash rates")]
    LengthMismatch { prices: usize, hash_rates: usize },

    #[error("series dates differ at index {index}: price {price_date}, hash rate {hash_rate_date}")]
    DateMismatch {
        index: usize,
        price_date: NaiveDate,
        hash_rate_date: NaiveDate,
    },

    #[error("dates not strictly ascending at index {index}: {date} follows {previous}")]
    NotAscending {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("invalid cost model: {0}")]
    InvalidCostModel(String),
}

/// Pure function of its inputs: reference tables and cost model are borrowed
/// and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    hardware: &'a HardwareTable,
    rates: &'a CurrencyRateTable,
    model: CostModel,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(hardware: &'a HardwareTable, rates: &'a CurrencyRateTable) -> Self {
        Self {
            hardware,
            rates,
            model: CostModel::default(),
        }
    }

    pub fn with_model(mut self, model: CostModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    /// Build the smoothed record sequence from two aligned series.
    ///
    /// Both series must have the same length and the same dates at every
    /// index, strictly ascending.
    pub fn compute(
        &self,
        prices: &[Observation],
        hash_rates: &[Observation],
    ) -> Result<Vec<DailyRecord>, MetricsError> {
        self.model.validate()?;
        check_alignment(prices, hash_rates)?;

        let mut records = prices
            .iter()
            .zip(hash_rates)
            .map(|(price, hash_rate)| self.derive(price.date, price.value, hash_rate.value))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(records = records.len(), "derived daily records");

        smooth_costs(&mut records, self.model.smoothing_window);
        Ok(records)
    }

    /// Derive one unsmoothed record. Both cost fields are `Some` on success.
    pub fn derive(
        &self,
        date: NaiveDate,
        btc_price: f64,
        hash_rate: f64,
    ) -> Result<DailyRecord, MetricsError> {
        if !btc_price.is_finite() {
            return Err(MetricsError::NonFinite {
                date,
                field: "btc_price",
                value: btc_price,
            });
        }
        if !(hash_rate.is_finite() && hash_rate > 0.0) {
            return Err(MetricsError::NonPositiveHashRate {
                date,
                value: hash_rate,
            });
        }

        let block_reward = block_reward(date);
        let currency_rate = self
            .rates
            .for_date(date)
            .ok_or(MetricsError::MissingCurrencyRate {
                date,
                year: date.year(),
                month: date.month(),
            })?;
        let hardware = self
            .hardware
            .get(date.year())
            .ok_or(MetricsError::MissingHardware {
                date,
                year: date.year(),
            })?;

        let btc_per_th = (block_reward * self.model.blocks_per_day) / hash_rate;
        let mining_cost = (hardware.kwt_h * self.model.electricity_usd_per_kwh * HOURS_PER_DAY)
            / (hardware.th_s * btc_per_th);
        let total_mining_cost = mining_cost / self.model.electricity_cost_share;

        ensure_finite(date, "btc_per_th", btc_per_th)?;
        ensure_finite(date, "mining_cost_usd", mining_cost)?;
        ensure_finite(date, "total_mining_cost_usd", total_mining_cost)?;

        Ok(DailyRecord {
            date,
            btc_price,
            hash_rate,
            block_reward,
            currency_rate,
            hardware_name: hardware.name.clone(),
            hash_power_th_s: hardware.th_s,
            power_draw_kwh: hardware.kwt_h,
            local_electricity_price: hardware.rub_kwt,
            btc_per_th,
            mining_cost_usd: Some(mining_cost),
            total_mining_cost_usd: Some(total_mining_cost),
        })
    }
}

fn ensure_finite(date: NaiveDate, field: &'static str, value: f64) -> Result<(), MetricsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MetricsError::NonFinite { date, field, value })
    }
}

/// Equal lengths, identical dates index by index, strictly ascending.
pub fn check_alignment(
    prices: &[Observation],
    hash_rates: &[Observation],
) -> Result<(), MetricsError> {
    if prices.len() != hash_rates.len() {
        return Err(MetricsError::LengthMismatch {
            prices: prices.len(),
            hash_rates: hash_rates.len(),
        });
    }

    for (index, (price, hash_rate)) in prices.iter().zip(hash_rates).enumerate() {
        if price.date != hash_rate.date {
            return Err(MetricsError::DateMismatch {
                index,
                price_date: price.date,
                hash_rate_date: hash_rate.date,
            });
        }
        if index > 0 && prices[index - 1].date >= price.date {
            return Err(MetricsError::NotAscending {
                index,
                previous: prices[index - 1].date,
                date: price.date,
            });
        }
    }
    Ok(())
}

/// Replace both cost fields with their trailing mean over `window` records.
///
/// Records must already be in ascending date order. A record whose raw cost
/// is `None` counts as a gap and voids every window containing it.
pub fn smooth_costs(records: &mut [DailyRecord], window: usize) {
    let raw_cost: Vec<f64> = records
        .iter()
        .map(|r| r.mining_cost_usd.unwrap_or(f64::NAN))
        .collect();
    let raw_total: Vec<f64> = records
        .iter()
        .map(|r| r.total_mining_cost_usd.unwrap_or(f64::NAN))
        .collect();

    let smoothed_cost = rolling_mean(&raw_cost, window);
    let smoothed_total = rolling_mean(&raw_total, window);

    for ((record, cost), total) in records.iter_mut().zip(smoothed_cost).zip(smoothed_total) {
        record.mining_cost_usd = cost;
        record.total_mining_cost_usd = total;
    }
}
