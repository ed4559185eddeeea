//! Hashcost CLI — download, compute, and ranges commands.
//!
//! Commands:
//! - `download` — fetch price and hash-rate series from blockchain.info and cache them
//! - `compute` — run the pipeline on cached data and save artifacts
//! - `ranges` — run the pipeline and print both detected range lists

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hashcost_core::data::{
    download_series, BlockchainInfoProvider, SeriesCache, SeriesKind, StdoutProgress,
};
use hashcost_core::domain::IndexRange;
use hashcost_runner::{run_pipeline, save_artifacts, PipelineOutput, RunConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "hashcost",
    about = "Hashcost CLI — Bitcoin mining cost versus market price"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download price and hash-rate series and cache them as JSON.
    Download {
        /// Path to a TOML config file; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start of the first window (YYYY-MM-DD). Defaults to 2019-01-01.
        #[arg(long)]
        start: Option<String>,

        /// Number of consecutive windows. Defaults to 7.
        #[arg(long)]
        windows: Option<usize>,

        /// Span of each window, e.g. 1year. Defaults to 1year.
        #[arg(long)]
        timespan: Option<String>,

        /// Pause between requests in milliseconds. Defaults to 1000.
        #[arg(long)]
        pause_ms: Option<u64>,

        /// Cache directory. Defaults to ./data.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Run the pipeline on cached data and save records.csv, chart.json and summary.md.
    Compute {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output directory for artifacts. Defaults to ./results.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the pipeline and print both detected range lists.
    Ranges {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print the range lists as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to a TOML config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache directory holding the downloaded series.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Currency rate file.
    #[arg(long)]
    currency: Option<PathBuf>,

    /// Hardware profile table (CSV).
    #[arg(long)]
    hardware: Option<PathBuf>,
}

impl InputArgs {
    fn resolve(self) -> Result<RunConfig> {
        let mut config = load_config(self.config)?;
        if let Some(dir) = self.cache_dir {
            config.paths.cache_dir = dir;
        }
        if let Some(path) = self.currency {
            config.paths.currency_file = path;
        }
        if let Some(path) = self.hardware {
            config.paths.hardware_file = path;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            config,
            start,
            windows,
            timespan,
            pause_ms,
            cache_dir,
        } => run_download(config, start, windows, timespan, pause_ms, cache_dir),
        Commands::Compute { inputs, output_dir } => run_compute(inputs, output_dir),
        Commands::Ranges { inputs, json } => run_ranges(inputs, json),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

fn run_download(
    config_path: Option<PathBuf>,
    start: Option<String>,
    windows: Option<usize>,
    timespan: Option<String>,
    pause_ms: Option<u64>,
    cache_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(start) = start.as_deref() {
        config.download.start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("invalid --start '{start}' (expected YYYY-MM-DD)"))?;
    }
    if let Some(windows) = windows {
        config.download.windows = windows;
    }
    if let Some(timespan) = timespan {
        config.download.timespan = timespan;
    }
    if let Some(pause_ms) = pause_ms {
        config.download.pause_ms = pause_ms;
    }
    if let Some(dir) = cache_dir {
        config.paths.cache_dir = dir;
    }
    config.validate()?;

    let plan = config.download.plan();
    let provider = BlockchainInfoProvider::new()?;
    let cache = SeriesCache::new(&config.paths.cache_dir);
    info!(
        start = %plan.start,
        windows = plan.windows,
        cache_dir = %config.paths.cache_dir.display(),
        "starting download"
    );

    let summary = download_series(&provider, &cache, &SeriesKind::ALL, &plan, &StdoutProgress);

    if !summary.all_succeeded() {
        for (kind, err) in &summary.errors {
            eprintln!("Error for {kind}: {err}");
        }
        bail!(
            "{} of {} series failed to download",
            summary.errors.len(),
            summary.total
        );
    }

    Ok(())
}

fn run_compute(inputs: InputArgs, output_dir: Option<PathBuf>) -> Result<()> {
    let mut config = inputs.resolve()?;
    if let Some(dir) = output_dir {
        config.paths.output_dir = dir;
    }

    let output = run_pipeline(&config)?;
    print_summary(&output);

    let run_dir = save_artifacts(&output, &config.paths.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn run_ranges(inputs: InputArgs, json: bool) -> Result<()> {
    let config = inputs.resolve()?;
    let output = run_pipeline(&config)?;
    let bands = &output.bands;

    if json {
        let value = serde_json::json!({
            "price_below_total_cost": bands.price_below_total_cost,
            "total_cost_below_price": bands.total_cost_below_price,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "price_below_total_cost: {}",
        format_ranges(&bands.price_below_total_cost)
    );
    println!(
        "total_cost_below_price: {}",
        format_ranges(&bands.total_cost_below_price)
    );
    Ok(())
}

fn format_ranges(ranges: &[IndexRange]) -> String {
    let parts: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn print_summary(output: &PipelineOutput) {
    let (Some(first), Some(last)) = (output.records.first(), output.records.last()) else {
        println!("No records.");
        return;
    };

    println!("\n=== Mining Cost Summary ===");
    println!("Period:         {} to {}", first.date, last.date);
    println!(
        "Days:           {} ({} with smoothed costs)",
        output.records.len(),
        output.costed_days()
    );
    println!(
        "Below cost:     {} days in {} ranges",
        output.unprofitable_days(),
        output.bands.price_below_total_cost.len()
    );
    println!(
        "Above cost:     {} days in {} ranges",
        output.profitable_days(),
        output.bands.total_cost_below_price.len()
    );
    for era in &output.eras {
        println!("Era:            {} {}", era.date, era.hardware_name);
    }
    println!("Dataset hash:   {}", output.dataset_hash);
}
