//! Hardware era markers: the first day of each hardware year in a record
//! sequence, labelled with the hardware in force for that year.

use crate::domain::DailyRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareEra {
    pub index: usize,
    pub date: NaiveDate,
    pub year: i32,
    pub hardware_name: String,
}

/// One marker per record dated 1 January.
pub fn hardware_eras(records: &[DailyRecord]) -> Vec<HardwareEra> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.date.month() == 1 && r.date.day() == 1)
        .map(|(index, r)| HardwareEra {
            index,
            date: r.date,
            year: r.date.year(),
            hardware_name: r.hardware_name.clone(),
        })
        .collect()
}
