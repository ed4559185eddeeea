//! Pipeline runner — wires cache, alignment, reference tables, the metrics
//! engine, interval detection and band selection together.
//!
//! Two entry points:
//! - `run_pipeline()`: loads everything named by a `RunConfig`. Used by the CLI.
//! - `run_from_inputs()`: takes pre-loaded series and tables. Used by tests
//!   and by callers that already hold the data in memory.

use hashcost_core::bands::{select_bands, BandSet};
use hashcost_core::data::{
    align_series, load_currency_rates, load_hardware_table, to_daily, AlignedSeries, DataError,
    SeriesCache, SeriesKind,
};
use hashcost_core::domain::DailyRecord;
use hashcost_core::eras::{hardware_eras, HardwareEra};
use hashcost_core::intervals::IntervalError;
use hashcost_core::metrics::{CostModel, MetricsEngine, MetricsError};
use hashcost_core::reference::{CurrencyRateTable, HardwareTable};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, RunConfig};

/// Errors from the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
    #[error("interval error: {0}")]
    Interval(#[from] IntervalError),
    #[error("price and hash-rate series share no dates")]
    NoOverlap,
}

/// Series and tables ready for the engine.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub series: AlignedSeries,
    pub hardware: HardwareTable,
    pub rates: CurrencyRateTable,
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<DailyRecord>,
    pub bands: BandSet,
    pub eras: Vec<HardwareEra>,
    pub cost_model: CostModel,
    /// BLAKE3 over the aligned input series.
    pub dataset_hash: String,
}

impl PipelineOutput {
    /// Days with both smoothed cost curves defined.
    pub fn costed_days(&self) -> usize {
        self.records.iter().filter(|r| r.has_costs()).count()
    }

    /// Days covered by the detected price-below-total-cost ranges.
    pub fn unprofitable_days(&self) -> usize {
        self.bands.price_below_total_cost.iter().map(|r| r.len()).sum()
    }

    /// Days covered by the detected total-cost-below-price ranges.
    pub fn profitable_days(&self) -> usize {
        self.bands.total_cost_below_price.iter().map(|r| r.len()).sum()
    }
}

/// Load cached series and reference tables named by `config`.
pub fn load_inputs(config: &RunConfig) -> Result<PipelineInputs, PipelineError> {
    let cache = SeriesCache::new(&config.paths.cache_dir);
    let prices = to_daily(&cache.load(SeriesKind::MarketPrice)?)?;
    let hash_rates = to_daily(&cache.load(SeriesKind::HashRate)?)?;
    debug!(
        prices = prices.len(),
        hash_rates = hash_rates.len(),
        "loaded daily series"
    );

    let series = align_series(&prices, &hash_rates);
    if series.is_empty() {
        return Err(PipelineError::NoOverlap);
    }

    let hardware = load_hardware_table(&config.paths.hardware_file)?;
    let rates = load_currency_rates(&config.paths.currency_file, &config.currency)?;

    Ok(PipelineInputs {
        series,
        hardware,
        rates,
    })
}

/// Run the engine, detector and band selector over pre-loaded inputs.
pub fn run_from_inputs(
    inputs: &PipelineInputs,
    model: CostModel,
) -> Result<PipelineOutput, PipelineError> {
    if inputs.series.is_empty() {
        return Err(PipelineError::NoOverlap);
    }

    let engine = MetricsEngine::new(&inputs.hardware, &inputs.rates).with_model(model);
    let records = engine.compute(&inputs.series.prices, &inputs.series.hash_rates)?;
    let bands = select_bands(&records)?;
    let eras = hardware_eras(&records);
    let dataset_hash = compute_dataset_hash(&inputs.series);

    let output = PipelineOutput {
        records,
        bands,
        eras,
        cost_model: model,
        dataset_hash,
    };
    info!(
        days = output.records.len(),
        unprofitable_ranges = output.bands.price_below_total_cost.len(),
        profitable_ranges = output.bands.total_cost_below_price.len(),
        "pipeline complete"
    );
    Ok(output)
}

/// Load everything named by `config` and run the full pipeline.
pub fn run_pipeline(config: &RunConfig) -> Result<PipelineOutput, PipelineError> {
    config.validate()?;
    info!(cache_dir = %config.paths.cache_dir.display(), "running pipeline");
    let inputs = load_inputs(config)?;
    run_from_inputs(&inputs, config.cost_model)
}

fn compute_dataset_hash(series: &AlignedSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for (price, hash_rate) in series.prices.iter().zip(&series.hash_rates) {
        hasher.update(price.date.to_string().as_bytes());
        hasher.update(&price.value.to_le_bytes());
        hasher.update(&hash_rate.value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
