//! Reference tables: hardware generations by year and monthly currency rates.
//!
//! Both tables are immutable keyed maps built once and passed into the
//! metrics engine. Lookups are exact-key; a miss is a configuration error
//! surfaced by the engine with the offending date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mining hardware assumed for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareProfile {
    pub year: i32,
    pub name: String,
    /// Hash power in Th/s.
    pub th_s: f64,
    /// Power draw in kWh per hour of operation.
    pub kwt_h: f64,
    /// Local electricity price per kWh, in local currency.
    pub rub_kwt: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("duplicate hardware profile for year {year}")]
    DuplicateYear { year: i32 },

    #[error("invalid hardware profile for year {year}: {reason}")]
    InvalidProfile { year: i32, reason: String },

    #[error("non-finite currency rate sample on {date}")]
    NonFiniteRate { date: NaiveDate },
}

/// Year → hardware profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareTable {
    profiles: BTreeMap<i32, HardwareProfile>,
}

impl HardwareTable {
    /// Build from a list of profiles. Each year may appear once.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = HardwareProfile>,
    ) -> Result<Self, TableError> {
        let mut map = BTreeMap::new();
        for profile in profiles {
            if !(profile.th_s.is_finite() && profile.kwt_h.is_finite()) {
                return Err(TableError::InvalidProfile {
                    year: profile.year,
                    reason: "hash power and power draw must be finite".into(),
                });
            }
            let year = profile.year;
            if map.insert(year, profile).is_some() {
                return Err(TableError::DuplicateYear { year });
            }
        }
        Ok(Self { profiles: map })
    }

    pub fn get(&self, year: i32) -> Option<&HardwareProfile> {
        self.profiles.get(&year)
    }

    /// Profiles ascending by year.
    pub fn profiles(&self) -> impl Iterator<Item = &HardwareProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// (year, month) → average local-currency per USD rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyRateTable {
    rates: BTreeMap<(i32, u32), f64>,
}

impl CurrencyRateTable {
    /// Build directly from already-averaged monthly rates.
    pub fn from_monthly(rates: impl IntoIterator<Item = ((i32, u32), f64)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// Build by averaging a raw (possibly sub-daily) rate series within each
    /// (year, month) bucket.
    pub fn from_samples(
        samples: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self, TableError> {
        let mut buckets: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
        for (date, value) in samples {
            if !value.is_finite() {
                return Err(TableError::NonFiniteRate { date });
            }
            let entry = buckets.entry((date.year(), date.month())).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let rates = buckets
            .into_iter()
            .map(|(key, (sum, count))| (key, sum / count as f64))
            .collect();
        Ok(Self { rates })
    }

    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        self.rates.get(&(year, month)).copied()
    }

    /// Rate for the month containing `date`.
    pub fn for_date(&self, date: NaiveDate) -> Option<f64> {
        self.get(date.year(), date.month())
    }

    /// `((year, month), rate)` ascending.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, u32), f64)> + '_ {
        self.rates.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
