//! hashcost core — halving schedule, reference tables, mining-cost engine,
//! interval detection and band selection.
//!
//! This crate contains:
//! - Domain types (observations, daily records, index ranges)
//! - Block-subsidy schedule
//! - Hardware and currency reference tables
//! - Metrics engine with trailing smoothing
//! - Threshold-crossing interval detector
//! - Band selector and hardware era markers for the chart layer
//! - Series download, JSON cache, daily alignment and table loaders

pub mod bands;
pub mod data;
pub mod domain;
pub mod eras;
pub mod halving;
pub mod intervals;
pub mod metrics;
pub mod reference;

pub use bands::{select_bands, Band, BandKind, BandSet};
pub use domain::{DailyRecord, IndexRange, Observation};
pub use eras::{hardware_eras, HardwareEra};
pub use halving::block_reward;
pub use intervals::{find_continuous_ranges, IntervalError};
pub use metrics::{CostModel, MetricsEngine, MetricsError};
pub use reference::{CurrencyRateTable, HardwareProfile, HardwareTable, TableError};
