//! Hashcost Runner — configuration, pipeline orchestration, artifact export.
//!
//! This crate builds on `hashcost-core` to provide:
//! - TOML run configuration with defaults for every section
//! - The end-to-end pipeline from cached series to bands and era markers
//! - Records CSV, chart payload JSON and Markdown summary export

pub mod config;
pub mod export;
pub mod pipeline;

pub use config::{ConfigError, DownloadConfig, PathsConfig, RunConfig};
pub use export::{
    export_json, export_records_csv, generate_report, import_json, load_artifacts,
    save_artifacts, ChartPayload, PayloadSummary, SCHEMA_VERSION,
};
pub use pipeline::{
    load_inputs, run_from_inputs, run_pipeline, PipelineError, PipelineInputs, PipelineOutput,
};
