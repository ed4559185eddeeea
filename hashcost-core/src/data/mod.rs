//! Raw series retrieval, caching, daily alignment, and reference table loading.

pub mod align;
pub mod blockchain;
pub mod cache;
pub mod download;
pub mod provider;
pub mod tables;

pub use align::{align_series, to_daily, AlignedSeries};
pub use blockchain::BlockchainInfoProvider;
pub use cache::{SeriesCache, SeriesMeta};
pub use download::{download_series, DownloadPlan, DownloadSummary};
pub use provider::{
    ChartPoint, DataError, DownloadProgress, SeriesKind, SeriesProvider, SilentProgress,
    StdoutProgress,
};
pub use tables::{
    load_currency_rates, load_hardware_table, read_currency_rates, read_hardware_table,
    CurrencyFileFormat,
};
