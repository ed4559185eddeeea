//! Observation — one dated value of a daily series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily sample of a market or network series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}
