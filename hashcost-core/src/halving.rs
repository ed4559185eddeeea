//! Bitcoin block-subsidy schedule.
//!
//! Piecewise-constant over calendar dates. Each halving date is the first day
//! the reduced subsidy applies.

use chrono::NaiveDate;

/// Subsidy before the first halving in the modelled period.
pub const INITIAL_BLOCK_REWARD: f64 = 12.5;

/// `(first day in force, subsidy)` for every halving after the initial era,
/// ascending by date.
const HALVINGS: [((i32, u32, u32), f64); 2] = [((2020, 5, 11), 6.25), ((2024, 4, 19), 3.125)];

/// Dates on which the subsidy halves, ascending.
pub fn halving_dates() -> Vec<NaiveDate> {
    HALVINGS
        .iter()
        .filter_map(|&((y, m, d), _)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

/// Block subsidy (BTC per block) in force on `date`.
pub fn block_reward(date: NaiveDate) -> f64 {
    HALVINGS
        .iter()
        .rev()
        .find(|&&((y, m, d), _)| {
            NaiveDate::from_ymd_opt(y, m, d).is_some_and(|halving| date >= halving)
        })
        .map(|&(_, reward)| reward)
        .unwrap_or(INITIAL_BLOCK_REWARD)
}
