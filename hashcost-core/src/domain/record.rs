//! DailyRecord — the enriched per-day row produced by the metrics engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of joined inputs and derived mining-cost metrics.
///
/// `mining_cost_usd` and `total_mining_cost_usd` hold the raw per-day costs
/// until the smoothing pass replaces them with their trailing average. After
/// smoothing, records without a full window carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub btc_price: f64,
    pub hash_rate: f64,
    pub block_reward: f64,
    /// Monthly average local-currency per USD rate.
    pub currency_rate: f64,
    pub hardware_name: String,
    pub hash_power_th_s: f64,
    pub power_draw_kwh: f64,
    /// Electricity price in local currency per kWh.
    pub local_electricity_price: f64,
    pub btc_per_th: f64,
    pub mining_cost_usd: Option<f64>,
    pub total_mining_cost_usd: Option<f64>,
}

impl DailyRecord {
    /// True once both cost curves carry a value.
    pub fn has_costs(&self) -> bool {
        self.mining_cost_usd.is_some() && self.total_mining_cost_usd.is_some()
    }

    /// Price strictly below total cost. False while total cost is undefined.
    pub fn price_below_total_cost(&self) -> bool {
        matches!(self.total_mining_cost_usd, Some(total) if self.btc_price < total)
    }

    /// Total cost strictly below price. False while total cost is undefined.
    pub fn total_cost_below_price(&self) -> bool {
        matches!(self.total_mining_cost_usd, Some(total) if total < self.btc_price)
    }
}
