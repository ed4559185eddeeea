//! Download orchestrator — fetches every window of every series in turn,
//! pausing between requests, and caches each completed series.

use super::cache::SeriesCache;
use super::provider::{ChartPoint, DataError, DownloadProgress, SeriesKind, SeriesProvider};
use chrono::{Days, Months, NaiveDate};
use std::time::Duration;
use tracing::info;

/// Which windows to request and how to pace them.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    /// Start of the first window.
    pub start: NaiveDate,
    /// Number of consecutive windows.
    pub windows: usize,
    /// Span of each window in API notation.
    pub timespan: String,
    /// Pause between consecutive requests.
    pub pause: Duration,
}

impl Default for DownloadPlan {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            windows: 7,
            timespan: "1year".into(),
            pause: Duration::from_secs(1),
        }
    }
}

impl DownloadPlan {
    /// Window `i` starts `i` years and `i` days after `start`, so consecutive
    /// one-year windows do not overlap.
    pub fn window_starts(&self) -> Vec<NaiveDate> {
        (0..self.windows)
            .filter_map(|i| {
                self.start
                    .checked_add_months(Months::new(12 * i as u32))?
                    .checked_add_days(Days::new(i as u64))
            })
            .collect()
    }
}

/// Summary of a download run.
#[derive(Debug)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: Vec<(SeriesKind, usize)>,
    pub errors: Vec<(SeriesKind, DataError)>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Download every series in `kinds` across all windows of `plan`.
///
/// A series is cached only when all of its windows succeed. A failed window
/// abandons the rest of that series; other series still run.
pub fn download_series(
    provider: &dyn SeriesProvider,
    cache: &SeriesCache,
    kinds: &[SeriesKind],
    plan: &DownloadPlan,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let starts = plan.window_starts();
    let mut succeeded = Vec::new();
    let mut errors = Vec::new();
    let mut first_request = true;

    for &kind in kinds {
        let mut points: Vec<ChartPoint> = Vec::new();
        let mut failure = None;

        for (i, &start) in starts.iter().enumerate() {
            if !first_request {
                std::thread::sleep(plan.pause);
            }
            first_request = false;

            progress.on_start(kind, start, i, starts.len());
            let result = provider.fetch(kind, &plan.timespan, start);
            let reported = result.as_ref().map(Vec::len).map_err(clone_for_report);
            progress.on_complete(kind, start, i, starts.len(), &reported);

            match result {
                Ok(window) => points.extend(window),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        let outcome = match failure {
            Some(e) => Err(e),
            None => cache.write(kind, &points).map(|meta| meta.point_count),
        };
        match outcome {
            Ok(count) => {
                info!(series = %kind, points = count, provider = provider.name(), "series cached");
                succeeded.push((kind, count));
            }
            Err(e) => errors.push((kind, e)),
        }
    }

    progress.on_batch_complete(succeeded.len(), errors.len(), kinds.len());

    DownloadSummary {
        total: kinds.len(),
        succeeded,
        errors,
    }
}

/// DataError is not Clone; progress only needs the message.
fn clone_for_report(e: &DataError) -> DataError {
    DataError::Other(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::SilentProgress;
    use std::sync::Mutex;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct MockProvider {
        calls: Mutex<Vec<(SeriesKind, NaiveDate)>>,
        fail_on: Option<(SeriesKind, NaiveDate)>,
    }

    impl MockProvider {
        fn new(fail_on: Option<(SeriesKind, NaiveDate)>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl SeriesProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn fetch(
            &self,
            kind: SeriesKind,
            _timespan: &str,
            start: NaiveDate,
        ) -> Result<Vec<ChartPoint>, DataError> {
            self.calls.lock().unwrap().push((kind, start));
            if self.fail_on == Some((kind, start)) {
                return Err(DataError::HttpStatus {
                    status: 500,
                    url: "mock".into(),
                });
            }
            let x = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
            Ok(vec![ChartPoint { x, y: 1.0 }])
        }
    }

    fn plan(windows: usize) -> DownloadPlan {
        DownloadPlan {
            windows,
            pause: Duration::ZERO,
            ..DownloadPlan::default()
        }
    }

    #[test]
    fn default_window_starts_shift_year_and_day() {
        let starts = DownloadPlan::default().window_starts();
        assert_eq!(starts.len(), 7);
        assert_eq!(starts[0], d("2019-01-01"));
        assert_eq!(starts[1], d("2020-01-02"));
        assert_eq!(starts[2], d("2021-01-03"));
        assert_eq!(starts[6], d("2025-01-07"));
    }

    #[test]
    fn leap_day_start_clamps() {
        let plan = DownloadPlan {
            start: d("2020-02-29"),
            windows: 2,
            ..DownloadPlan::default()
        };
        assert_eq!(plan.window_starts(), vec![d("2020-02-29"), d("2021-03-01")]);
    }

    #[test]
    fn downloads_and_caches_every_series() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(dir.path());
        let provider = MockProvider::new(None);

        let summary = download_series(&provider, &cache, &SeriesKind::ALL, &plan(3), &SilentProgress);

        assert!(summary.all_succeeded());
        assert_eq!(summary.succeeded.len(), 2);
        assert_eq!(provider.calls.lock().unwrap().len(), 6);
        assert_eq!(cache.load(SeriesKind::HashRate).unwrap().len(), 3);
        assert_eq!(cache.load(SeriesKind::MarketPrice).unwrap().len(), 3);
    }

    #[test]
    fn failed_window_skips_rest_of_that_series_only() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(dir.path());
        let provider = MockProvider::new(Some((SeriesKind::HashRate, d("2020-01-02"))));

        let summary = download_series(&provider, &cache, &SeriesKind::ALL, &plan(3), &SilentProgress);

        assert!(!summary.all_succeeded());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].0, SeriesKind::HashRate);
        assert!(!cache.contains(SeriesKind::HashRate));
        assert!(cache.contains(SeriesKind::MarketPrice));
        // 2 hash-rate calls (second fails) + 3 market-price calls.
        assert_eq!(provider.calls.lock().unwrap().len(), 5);
    }
}
