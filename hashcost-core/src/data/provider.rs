//! Series provider trait and structured error types.
//!
//! The SeriesProvider trait abstracts over chart sources (blockchain.info,
//! in-memory fixtures) so the download orchestrator can be tested without
//! network access.

use crate::reference::TableError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One raw sample as returned by the charts API: unix seconds and a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: f64,
}

/// The raw series the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    MarketPrice,
    HashRate,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 2] = [SeriesKind::HashRate, SeriesKind::MarketPrice];

    /// Chart name used by the API and by cache file names.
    pub fn slug(&self) -> &'static str {
        match self {
            SeriesKind::MarketPrice => "market-price",
            SeriesKind::HashRate => "hash-rate",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Structured error types for data operations.
///
/// Displayable directly in the CLI.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("no cached data for series '{series}' — run `download` first")]
    NoCachedData { series: SeriesKind },

    #[error("{source_name}, line {line}: {reason}")]
    Parse {
        source_name: String,
        line: u64,
        reason: String,
    },

    #[error("missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for chart sources.
///
/// The cache layer sits above this trait — providers don't know about the cache.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch one window of a series starting at `start` and spanning
    /// `timespan` (API notation, e.g. `1year`).
    fn fetch(
        &self,
        kind: SeriesKind,
        timespan: &str,
        start: NaiveDate,
    ) -> Result<Vec<ChartPoint>, DataError>;
}

/// Progress callback for multi-window downloads.
pub trait DownloadProgress: Send {
    /// Called before a window is requested.
    fn on_start(&self, kind: SeriesKind, start: NaiveDate, index: usize, total: usize);

    /// Called after a window completes; `Ok` carries the point count.
    fn on_complete(
        &self,
        kind: SeriesKind,
        start: NaiveDate,
        index: usize,
        total: usize,
        result: &Result<usize, DataError>,
    );

    /// Called when every series is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl DownloadProgress for StdoutProgress {
    fn on_start(&self, kind: SeriesKind, start: NaiveDate, index: usize, total: usize) {
        println!("[{}/{}] Fetching {kind} from {start}...", index + 1, total);
    }

    fn on_complete(
        &self,
        kind: SeriesKind,
        _start: NaiveDate,
        _index: usize,
        _total: usize,
        result: &Result<usize, DataError>,
    ) {
        match result {
            Ok(points) => println!("  OK: {kind} ({points} points)"),
            Err(e) => println!("  FAIL: {kind}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nDownload complete: {succeeded}/{total} series succeeded, {failed} failed");
    }
}

/// Progress reporter that discards every event.
pub struct SilentProgress;

impl DownloadProgress for SilentProgress {
    fn on_start(&self, _: SeriesKind, _: NaiveDate, _: usize, _: usize) {}

    fn on_complete(
        &self,
        _: SeriesKind,
        _: NaiveDate,
        _: usize,
        _: usize,
        _: &Result<usize, DataError>,
    ) {
    }

    fn on_batch_complete(&self, _: usize, _: usize, _: usize) {}
}
