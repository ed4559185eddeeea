//! Daily alignment of raw chart series.
//!
//! Raw points are bucketed to their UTC calendar day; the two series are then
//! inner-joined on date so the metrics engine receives identically dated,
//! equal-length inputs.

use super::provider::{ChartPoint, DataError};
use crate::domain::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Price and hash-rate series on a common, strictly ascending date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub prices: Vec<Observation>,
    pub hash_rates: Vec<Observation>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.prices.iter().map(|o| o.date)
    }
}

/// Convert raw points to one observation per UTC day, ascending.
///
/// When several points fall on the same day the last one in input order wins.
pub fn to_daily(points: &[ChartPoint]) -> Result<Vec<Observation>, DataError> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut collapsed = 0usize;

    for point in points {
        let date = chrono::DateTime::from_timestamp(point.x, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {}", point.x))
            })?;
        if by_date.insert(date, point.y).is_some() {
            collapsed += 1;
        }
    }

    if collapsed > 0 {
        warn!(collapsed, "collapsed same-day points, kept the last of each day");
    }

    Ok(by_date
        .into_iter()
        .map(|(date, value)| Observation::new(date, value))
        .collect())
}

/// Inner-join two daily series on date.
///
/// Inputs must each be strictly ascending (as produced by [`to_daily`]).
pub fn align_series(prices: &[Observation], hash_rates: &[Observation]) -> AlignedSeries {
    let hash_by_date: BTreeMap<NaiveDate, f64> =
        hash_rates.iter().map(|o| (o.date, o.value)).collect();

    let mut aligned_prices = Vec::with_capacity(prices.len().min(hash_rates.len()));
    let mut aligned_hash = Vec::with_capacity(aligned_prices.capacity());

    for price in prices {
        if let Some(&hash_rate) = hash_by_date.get(&price.date) {
            aligned_prices.push(*price);
            aligned_hash.push(Observation::new(price.date, hash_rate));
        }
    }

    debug!(
        prices = prices.len(),
        hash_rates = hash_rates.len(),
        aligned = aligned_prices.len(),
        "aligned series on date"
    );

    AlignedSeries {
        prices: aligned_prices,
        hash_rates: aligned_hash,
    }
}
