//! Threshold-crossing interval detection.
//!
//! Scans two aligned sequences once and reports the maximal runs of indices
//! where the first is strictly below the second. Ranges come out sorted,
//! non-overlapping and separated by at least one index.

use crate::domain::IndexRange;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Maximal index ranges where `a[i] < b[i]`.
///
/// Comparison is strict with no tolerance. Pairs that do not compare (NaN)
/// count as false.
pub fn find_continuous_ranges<T: PartialOrd>(
    a: &[T],
    b: &[T],
) -> Result<Vec<IndexRange>, IntervalError> {
    if a.len() != b.len() {
        return Err(IntervalError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(ranges_from_mask(a.iter().zip(b).map(|(x, y)| x < y)))
}

/// Maximal runs of `true` in `mask`.
pub fn ranges_from_mask(mask: impl IntoIterator<Item = bool>) -> Vec<IndexRange> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    let mut len = 0;

    for (idx, is_less) in mask.into_iter().enumerate() {
        len = idx + 1;
        match (is_less, open) {
            (true, None) => open = Some(idx),
            (false, Some(start)) => {
                ranges.extend(IndexRange::new(start, idx - 1));
                open = None;
            }
            _ => {}
        }
    }

    // A run still open reaches the final index.
    if let Some(start) = open {
        ranges.extend(IndexRange::new(start, len - 1));
    }

    ranges
}
