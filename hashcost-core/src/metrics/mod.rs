//! Mining-cost metrics: per-day derivation and trailing smoothing.

pub mod engine;
pub mod rolling;

pub use engine::{check_alignment, smooth_costs, CostModel, MetricsEngine, MetricsError};
pub use rolling::rolling_mean;
