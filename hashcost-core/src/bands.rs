//! Band selection: turns detected index ranges into fill bands between the
//! mining-cost curve (lower) and the total-mining-cost curve (upper).
//!
//! Two band kinds:
//! - `Unprofitable`: price below total cost. Covers exactly the detected range.
//! - `Profitable`: total cost below price. Widened by one record on each side
//!   so the fill meets the neighbouring unfilled segment, clamped to the
//!   sequence bounds.
//!
//! Neither kind reaches into records without smoothed costs, so a profitable
//! band next to the warm-up starts at the first costed record rather than at
//! `start - 1`.

use crate::domain::{DailyRecord, IndexRange};
use crate::intervals::{find_continuous_ranges, IntervalError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Records added on each side of a profitable range.
pub const PROFITABLE_EXTENSION: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    /// Market price strictly below total mining cost.
    Unprofitable,
    /// Total mining cost strictly below market price.
    Profitable,
}

impl BandKind {
    /// Records added on each side of a detected range before slicing.
    pub fn extension(&self) -> usize {
        match self {
            BandKind::Unprofitable => 0,
            BandKind::Profitable => PROFITABLE_EXTENSION,
        }
    }
}

/// A fill band ready for a "fill between two curves" primitive.
///
/// `dates`, `lower` and `upper` are parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub kind: BandKind,
    /// Range as detected.
    pub detected: IndexRange,
    /// Range actually sliced after extension.
    pub range: IndexRange,
    pub dates: Vec<NaiveDate>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Band {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Both range lists and the bands derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    pub price_below_total_cost: Vec<IndexRange>,
    pub total_cost_below_price: Vec<IndexRange>,
    pub unprofitable: Vec<Band>,
    pub profitable: Vec<Band>,
}

/// Market price per record.
pub fn price_series(records: &[DailyRecord]) -> Vec<f64> {
    records.iter().map(|r| r.btc_price).collect()
}

/// Total mining cost per record, NaN while undefined.
pub fn total_cost_series(records: &[DailyRecord]) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.total_mining_cost_usd.unwrap_or(f64::NAN))
        .collect()
}

/// Run detection in both directions and build every band.
pub fn select_bands(records: &[DailyRecord]) -> Result<BandSet, IntervalError> {
    let price = price_series(records);
    let total = total_cost_series(records);

    let price_below_total_cost = find_continuous_ranges(&price, &total)?;
    let total_cost_below_price = find_continuous_ranges(&total, &price)?;

    Ok(BandSet {
        unprofitable: bands_for_ranges(records, &price_below_total_cost, BandKind::Unprofitable),
        profitable: bands_for_ranges(records, &total_cost_below_price, BandKind::Profitable),
        price_below_total_cost,
        total_cost_below_price,
    })
}

/// One band per range; ranges that run past the last record or cover no
/// record with both costs defined are skipped.
pub fn bands_for_ranges(
    records: &[DailyRecord],
    ranges: &[IndexRange],
    kind: BandKind,
) -> Vec<Band> {
    ranges
        .iter()
        .filter_map(|&range| band_for_range(records, range, kind))
        .collect()
}

fn band_for_range(records: &[DailyRecord], detected: IndexRange, kind: BandKind) -> Option<Band> {
    let last = records.len().checked_sub(1)?;
    if detected.end() > last {
        return None;
    }

    let widened = detected.extended_clamped(kind.extension(), last);
    // Extension never reaches into the smoothing warm-up.
    let start = widened
        .indices()
        .find(|&i| records[i].has_costs())?;
    let end = widened
        .indices()
        .rev()
        .find(|&i| records[i].has_costs())?;
    let range = IndexRange::new(start, end)?;

    let mut dates = Vec::with_capacity(range.len());
    let mut lower = Vec::with_capacity(range.len());
    let mut upper = Vec::with_capacity(range.len());
    for record in &records[range.start()..=range.end()] {
        if let (Some(lo), Some(hi)) = (record.mining_cost_usd, record.total_mining_cost_usd) {
            dates.push(record.date);
            lower.push(lo);
            upper.push(hi);
        }
    }

    Some(Band {
        kind,
        detected,
        range,
        dates,
        lower,
        upper,
    })
}
