//! Artifact export — records CSV, chart payload JSON, and a Markdown summary.
//!
//! The chart payload carries a `schema_version` field. Payloads written by a
//! newer version are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use hashcost_core::bands::Band;
use hashcost_core::domain::{DailyRecord, IndexRange};
use hashcost_core::eras::HardwareEra;
use hashcost_core::metrics::CostModel;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineOutput;

/// Current schema version for persisted chart payloads.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything a chart front-end needs: three curves on a shared date axis,
/// both range lists, both band lists, and hardware era markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub dataset_hash: String,
    pub cost_model: CostModel,
    pub dates: Vec<NaiveDate>,
    pub btc_price: Vec<f64>,
    pub mining_cost_usd: Vec<Option<f64>>,
    pub total_mining_cost_usd: Vec<Option<f64>>,
    pub price_below_total_cost: Vec<IndexRange>,
    pub total_cost_below_price: Vec<IndexRange>,
    pub unprofitable_bands: Vec<Band>,
    pub profitable_bands: Vec<Band>,
    pub eras: Vec<HardwareEra>,
    pub summary: PayloadSummary,
}

/// Headline counts for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadSummary {
    pub days: usize,
    pub costed_days: usize,
    pub unprofitable_days: usize,
    pub profitable_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ChartPayload {
    pub fn from_output(output: &PipelineOutput) -> Self {
        let records = &output.records;
        Self {
            schema_version: SCHEMA_VERSION,
            dataset_hash: output.dataset_hash.clone(),
            cost_model: output.cost_model,
            dates: records.iter().map(|r| r.date).collect(),
            btc_price: records.iter().map(|r| r.btc_price).collect(),
            mining_cost_usd: records.iter().map(|r| r.mining_cost_usd).collect(),
            total_mining_cost_usd: records.iter().map(|r| r.total_mining_cost_usd).collect(),
            price_below_total_cost: output.bands.price_below_total_cost.clone(),
            total_cost_below_price: output.bands.total_cost_below_price.clone(),
            unprofitable_bands: output.bands.unprofitable.clone(),
            profitable_bands: output.bands.profitable.clone(),
            eras: output.eras.clone(),
            summary: PayloadSummary {
                days: records.len(),
                costed_days: output.costed_days(),
                unprofitable_days: output.unprofitable_days(),
                profitable_days: output.profitable_days(),
                first_date: records.first().map(|r| r.date),
                last_date: records.last().map(|r| r.date),
            },
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(payload: &ChartPayload) -> Result<String> {
    serde_json::to_string_pretty(payload).context("failed to serialize ChartPayload to JSON")
}

/// Deserialize a `ChartPayload`, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<ChartPayload> {
    let payload: ChartPayload =
        serde_json::from_str(json).context("failed to deserialize ChartPayload from JSON")?;
    if payload.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            payload.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(payload)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per record. Smoothed cost cells stay empty during warm-up.
pub fn export_records_csv(records: &[DailyRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "btc_price",
        "hash_rate",
        "block_reward",
        "currency_rate",
        "hardware_name",
        "hash_power_th_s",
        "power_draw_kwh",
        "local_electricity_price",
        "btc_per_th",
        "mining_cost_usd",
        "total_mining_cost_usd",
    ])?;

    for r in records {
        wtr.write_record([
            &r.date.to_string(),
            &format!("{:.2}", r.btc_price),
            &r.hash_rate.to_string(),
            &r.block_reward.to_string(),
            &format!("{:.4}", r.currency_rate),
            &r.hardware_name,
            &r.hash_power_th_s.to_string(),
            &r.power_draw_kwh.to_string(),
            &r.local_electricity_price.to_string(),
            &format!("{:e}", r.btc_per_th),
            &optional_cell(r.mining_cost_usd),
            &optional_cell(r.total_mining_cost_usd),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run.
///
/// Creates `hashcost_{timestamp}/` under `output_dir` containing
/// `records.csv`, `chart.json` and `summary.md`. Returns the directory.
pub fn save_artifacts(output: &PipelineOutput, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("hashcost_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let csv = export_records_csv(&output.records)?;
    std::fs::write(run_dir.join("records.csv"), csv)
        .with_context(|| format!("failed to write records.csv in {}", run_dir.display()))?;

    let payload = ChartPayload::from_output(output);
    let json = export_json(&payload)?;
    std::fs::write(run_dir.join("chart.json"), json)
        .with_context(|| format!("failed to write chart.json in {}", run_dir.display()))?;

    std::fs::write(run_dir.join("summary.md"), generate_report(&payload))
        .with_context(|| format!("failed to write summary.md in {}", run_dir.display()))?;

    Ok(run_dir)
}

/// Load the chart payload from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<ChartPayload> {
    let path = dir.join("chart.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

pub fn generate_report(payload: &ChartPayload) -> String {
    let mut md = String::with_capacity(2048);
    let s = &payload.summary;

    md.push_str("# Mining Cost Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    match (s.first_date, s.last_date) {
        (Some(first), Some(last)) => md.push_str(&format!("| Period | {first} to {last} |\n")),
        _ => md.push_str("| Period | (empty) |\n"),
    }
    md.push_str(&format!(
        "| Days | {} ({} with smoothed costs) |\n",
        s.days, s.costed_days
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", payload.dataset_hash));
    md.push('\n');

    let m = &payload.cost_model;
    md.push_str("## Cost Model\n\n");
    md.push_str("| Parameter | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Blocks per Day | {} |\n", m.blocks_per_day));
    md.push_str(&format!(
        "| Electricity (USD/kWh) | {} |\n",
        m.electricity_usd_per_kwh
    ));
    md.push_str(&format!(
        "| Electricity Cost Share | {:.0}% |\n",
        m.electricity_cost_share * 100.0
    ));
    md.push_str(&format!("| Smoothing Window | {} days |\n", m.smoothing_window));
    md.push('\n');

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Price Below Total Cost | {} days in {} ranges |\n",
        s.unprofitable_days,
        payload.price_below_total_cost.len()
    ));
    md.push_str(&format!(
        "| Total Cost Below Price | {} days in {} ranges |\n",
        s.profitable_days,
        payload.total_cost_below_price.len()
    ));
    md.push('\n');

    if !payload.unprofitable_bands.is_empty() {
        md.push_str("## Price Below Total Cost\n\n");
        push_band_table(&mut md, &payload.unprofitable_bands);
    }
    if !payload.profitable_bands.is_empty() {
        md.push_str("## Total Cost Below Price\n\n");
        push_band_table(&mut md, &payload.profitable_bands);
    }

    if !payload.eras.is_empty() {
        md.push_str("## Hardware Eras\n\n");
        md.push_str("| Date | Hardware |\n");
        md.push_str("| --- | --- |\n");
        for era in &payload.eras {
            md.push_str(&format!("| {} | {} |\n", era.date, era.hardware_name));
        }
        md.push('\n');
    }

    md
}

fn push_band_table(md: &mut String, bands: &[Band]) {
    md.push_str("| From | To | Days | Range |\n");
    md.push_str("| --- | --- | --- | --- |\n");
    for band in bands {
        let (Some(first), Some(last)) = (band.dates.first(), band.dates.last()) else {
            continue;
        };
        md.push_str(&format!(
            "| {first} | {last} | {} | {} |\n",
            band.detected.len(),
            band.detected
        ));
    }
    md.push('\n');
}
