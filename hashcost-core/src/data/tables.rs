//! Loaders for the reference tables.
//!
//! - Currency rates: delimited export of a sub-daily USD rate series. Rows are
//!   averaged per (year, month).
//! - Hardware: CSV with header `year,name,th_s,kwt_h,rub_kwt`, one row per year.

use super::provider::DataError;
use crate::reference::{CurrencyRateTable, HardwareProfile, HardwareTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

/// Layout of the currency rate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFileFormat {
    pub delimiter: char,
    pub date_column: String,
    pub value_column: String,
}

impl Default for CurrencyFileFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            date_column: "#Date".into(),
            value_column: "Value 18:50 MSK".into(),
        }
    }
}

/// Load and average a currency rate file.
pub fn load_currency_rates(
    path: &Path,
    format: &CurrencyFileFormat,
) -> Result<CurrencyRateTable, DataError> {
    let file = open(path)?;
    read_currency_rates(file, &path.display().to_string(), format)
}

/// Parse a currency rate table from any reader. `source_name` labels errors.
pub fn read_currency_rates<R: Read>(
    reader: R,
    source_name: &str,
    format: &CurrencyFileFormat,
) -> Result<CurrencyRateTable, DataError> {
    if !format.delimiter.is_ascii() {
        return Err(DataError::Other(format!(
            "delimiter must be ASCII, got '{}'",
            format.delimiter
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(format.delimiter as u8)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| parse_error(source_name, 1, e))?.clone();
    let date_idx = column_index(&headers, &format.date_column, source_name)?;
    let value_idx = column_index(&headers, &format.value_column, source_name)?;

    let mut samples = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| parse_error(source_name, 0, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let raw_date = row.get(date_idx).unwrap_or("");
        let raw_value = row.get(value_idx).unwrap_or("");
        if raw_date.is_empty() && raw_value.is_empty() {
            continue;
        }

        let date = parse_date(raw_date).ok_or_else(|| DataError::Parse {
            source_name: source_name.to_string(),
            line,
            reason: format!("unrecognised date '{raw_date}'"),
        })?;
        let value = parse_decimal(raw_value).ok_or_else(|| DataError::Parse {
            source_name: source_name.to_string(),
            line,
            reason: format!("unrecognised rate '{raw_value}'"),
        })?;
        samples.push((date, value));
    }

    let table = CurrencyRateTable::from_samples(samples.iter().copied())?;
    debug!(samples = samples.len(), months = table.len(), "loaded currency rates");
    Ok(table)
}

/// Load the hardware profile table.
pub fn load_hardware_table(path: &Path) -> Result<HardwareTable, DataError> {
    let file = open(path)?;
    read_hardware_table(file, &path.display().to_string())
}

/// Parse a hardware profile table from any reader. `source_name` labels errors.
pub fn read_hardware_table<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<HardwareTable, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut profiles = Vec::new();
    for row in rdr.deserialize::<HardwareProfile>() {
        profiles.push(row.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            parse_error(source_name, line, e)
        })?);
    }

    let table = HardwareTable::from_profiles(profiles)?;
    debug!(years = table.len(), "loaded hardware table");
    Ok(table)
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_error(source_name: &str, line: u64, e: csv::Error) -> DataError {
    DataError::Parse {
        source_name: source_name.to_string(),
        line,
        reason: e.to_string(),
    }
}

fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    source_name: &str,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| DataError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        })
}

/// Date with an optional trailing time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Accepts `.` or `,` as the decimal separator.
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}
