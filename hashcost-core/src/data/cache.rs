//! JSON cache for downloaded chart series.
//!
//! Layout: `{cache_dir}/{series}.json` plus `{cache_dir}/{series}.meta.json`.
//!
//! Writes are atomic (write to .tmp, rename into place). The sidecar records
//! point count, covered dates and a BLAKE3 hash of the stored points.

use super::provider::{ChartPoint, DataError, SeriesKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub series: SeriesKind,
    pub point_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub data_hash: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// The series cache.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    cache_dir: PathBuf,
}

impl SeriesCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn data_path(&self, kind: SeriesKind) -> PathBuf {
        self.cache_dir.join(format!("{}.json", kind.slug()))
    }

    fn meta_path(&self, kind: SeriesKind) -> PathBuf {
        self.cache_dir.join(format!("{}.meta.json", kind.slug()))
    }

    /// Store a series, replacing anything cached before.
    pub fn write(&self, kind: SeriesKind, points: &[ChartPoint]) -> Result<SeriesMeta, DataError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let data = serde_json::to_vec_pretty(points)
            .map_err(|e| DataError::CacheError(format!("series serialization: {e}")))?;

        let path = self.data_path(kind);
        write_atomic(&path, &data)?;

        let dates = || {
            points
                .iter()
                .filter_map(|p| chrono::DateTime::from_timestamp(p.x, 0))
                .map(|dt| dt.date_naive())
        };
        let meta = SeriesMeta {
            series: kind,
            point_count: points.len(),
            first_date: dates().min(),
            last_date: dates().max(),
            data_hash: blake3::hash(&data).to_hex().to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_vec_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        write_atomic(&self.meta_path(kind), &meta_json)?;

        Ok(meta)
    }

    /// Load a cached series in stored order.
    pub fn load(&self, kind: SeriesKind) -> Result<Vec<ChartPoint>, DataError> {
        let path = self.data_path(kind);
        if !path.exists() {
            return Err(DataError::NoCachedData { series: kind });
        }

        let data = fs::read(&path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&data)
            .map_err(|e| DataError::CacheError(format!("corrupt cache {}: {e}", path.display())))
    }

    /// Sidecar metadata, if the series is cached.
    pub fn meta(&self, kind: SeriesKind) -> Option<SeriesMeta> {
        let content = fs::read(self.meta_path(kind)).ok()?;
        serde_json::from_slice(&content).ok()
    }

    pub fn contains(&self, kind: SeriesKind) -> bool {
        self.data_path(kind).exists()
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), DataError> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data).map_err(|e| DataError::Io {
        path: tmp_path.display().to_string(),
        reason: e.to_string(),
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::CacheError(format!("atomic rename failed: {e}"))
    })
}
