//! Serializable run configuration.
//!
//! Every section carries `#[serde(default)]`, so a partial TOML file (or an
//! empty one) yields a usable configuration:
//!
//! ```toml
//! [paths]
//! cache_dir = "data"
//! currency_file = "Rtsudcur.csv"
//! hardware_file = "hardware.csv"
//! output_dir = "results"
//!
//! [currency]
//! delimiter = ";"
//! date_column = "#Date"
//! value_column = "Value 18:50 MSK"
//!
//! [cost_model]
//! smoothing_window = 7
//!
//! [download]
//! start = "2019-01-01"
//! windows = 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use hashcost_core::data::{CurrencyFileFormat, DownloadPlan};
use hashcost_core::metrics::CostModel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub paths: PathsConfig,
    pub currency: CurrencyFileFormat,
    pub cost_model: CostModel,
    pub download: DownloadConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the cached series JSON files.
    pub cache_dir: PathBuf,
    /// Sub-daily USD rate export.
    pub currency_file: PathBuf,
    /// Hardware profile table (`year,name,th_s,kwt_h,rub_kwt`).
    pub hardware_file: PathBuf,
    /// Artifacts land in a timestamped directory under this one.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            currency_file: PathBuf::from("Rtsudcur.csv"),
            hardware_file: PathBuf::from("hardware.csv"),
            output_dir: PathBuf::from("results"),
        }
    }
}

/// Serializable form of [`DownloadPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub start: NaiveDate,
    pub windows: usize,
    pub timespan: String,
    pub pause_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let plan = DownloadPlan::default();
        Self {
            start: plan.start,
            windows: plan.windows,
            timespan: plan.timespan,
            pause_ms: plan.pause.as_millis() as u64,
        }
    }
}

impl DownloadConfig {
    pub fn plan(&self) -> DownloadPlan {
        DownloadPlan {
            start: self.start,
            windows: self.windows,
            timespan: self.timespan.clone(),
            pause: Duration::from_millis(self.pause_ms),
        }
    }
}

impl RunConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cost_model
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !self.currency.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "currency delimiter must be ASCII, got '{}'",
                self.currency.delimiter
            )));
        }
        if self.download.windows == 0 {
            return Err(ConfigError::Invalid("download.windows must be >= 1".into()));
        }
        if self.download.timespan.trim().is_empty() {
            return Err(ConfigError::Invalid("download.timespan is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.cost_model.smoothing_window, 7);
        assert_eq!(config.currency.delimiter, ';');
        assert_eq!(config.paths.cache_dir, PathBuf::from("data"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RunConfig::from_toml(
            r#"
[paths]
hardware_file = "tables/hw.csv"

[cost_model]
electricity_cost_share = 0.5
"#,
        )
        .unwrap();
        assert_eq!(config.paths.hardware_file, PathBuf::from("tables/hw.csv"));
        assert_eq!(config.paths.output_dir, PathBuf::from("results"));
        assert_eq!(config.cost_model.electricity_cost_share, 0.5);
        assert_eq!(config.cost_model.blocks_per_day, 144.0);
    }

    #[test]
    fn download_section_builds_plan() {
        let config = RunConfig::from_toml(
            r#"
[download]
start = "2020-06-01"
windows = 2
pause_ms = 0
"#,
        )
        .unwrap();
        let plan = config.download.plan();
        assert_eq!(plan.start, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(plan.windows, 2);
        assert_eq!(plan.timespan, "1year");
        assert_eq!(plan.pause, Duration::ZERO);
    }

    #[test]
    fn default_download_matches_plan_default() {
        assert_eq!(DownloadConfig::default().plan(), DownloadPlan::default());
    }

    #[test]
    fn invalid_cost_model_rejected() {
        let err = RunConfig::from_toml("[cost_model]\nsmoothing_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_windows_rejected() {
        let err = RunConfig::from_toml("[download]\nwindows = 0\n").unwrap_err();
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = RunConfig::from_toml("[paths\ncache_dir = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = RunConfig::default();
        config.cost_model.smoothing_window = 14;
        config.paths.currency_file = PathBuf::from("usd.csv");
        let text = config.to_toml().unwrap();
        assert_eq!(RunConfig::from_toml(&text).unwrap(), config);
    }

    fn arb_config() -> impl Strategy<Value = RunConfig> {
        (
            ("[a-z]{1,12}", "[a-z]{1,12}\\.csv", "[a-z]{1,12}\\.csv", "[a-z]{1,12}"),
            prop::sample::select(vec![';', ',', '|', '\t']),
            (1.0..1_000.0_f64, 0.0..1.0_f64, 0.01..1.0_f64, 1usize..60),
            (0i64..3_000, 1usize..20, 0u64..10_000),
        )
            .prop_map(|(paths, delimiter, model, download)| {
                let (cache, currency, hardware, output) = paths;
                let (blocks_per_day, usd_per_kwh, share, window) = model;
                let (offset, windows, pause_ms) = download;
                RunConfig {
                    paths: PathsConfig {
                        cache_dir: PathBuf::from(cache),
                        currency_file: PathBuf::from(currency),
                        hardware_file: PathBuf::from(hardware),
                        output_dir: PathBuf::from(output),
                    },
                    currency: CurrencyFileFormat {
                        delimiter,
                        ..CurrencyFileFormat::default()
                    },
                    cost_model: CostModel {
                        blocks_per_day,
                        electricity_usd_per_kwh: usd_per_kwh,
                        electricity_cost_share: share,
                        smoothing_window: window,
                    },
                    download: DownloadConfig {
                        start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
                            + chrono::Duration::days(offset),
                        windows,
                        timespan: "1year".into(),
                        pause_ms,
                    },
                }
            })
    }

    proptest! {
        #[test]
        fn any_valid_config_survives_toml(config in arb_config()) {
            prop_assert!(config.validate().is_ok());
            let text = config.to_toml().unwrap();
            prop_assert_eq!(RunConfig::from_toml(&text).unwrap(), config);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RunConfig::from_file(Path::new("/nonexistent/hashcost.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
