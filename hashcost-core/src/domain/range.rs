//! IndexRange — an inclusive run of positions in a record sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive, zero-based `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct IndexRange {
    start: usize,
    end: usize,
}

#[derive(Deserialize)]
struct RangeBounds {
    start: usize,
    end: usize,
}

impl TryFrom<RangeBounds> for IndexRange {
    type Error = String;

    fn try_from(b: RangeBounds) -> Result<Self, Self::Error> {
        IndexRange::new(b.start, b.end)
            .ok_or_else(|| format!("range start {} exceeds end {}", b.start, b.end))
    }
}

impl IndexRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered (always >= 1).
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Widen by `by` on each side without leaving `[0, last]`.
    pub fn extended_clamped(&self, by: usize, last: usize) -> Self {
        Self {
            start: self.start.saturating_sub(by),
            end: self.end.saturating_add(by).min(last.max(self.end)),
        }
    }

    /// Iterate the covered indices.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        assert!(IndexRange::new(3, 2).is_none());
        assert_eq!(IndexRange::new(2, 2).unwrap().len(), 1);
    }

    #[test]
    fn extension_clamps_at_both_ends() {
        let first = IndexRange::new(0, 2).unwrap();
        assert_eq!(first.extended_clamped(1, 9), IndexRange::new(0, 3).unwrap());

        let last = IndexRange::new(7, 9).unwrap();
        assert_eq!(last.extended_clamped(1, 9), IndexRange::new(6, 9).unwrap());

        let whole = IndexRange::new(0, 9).unwrap();
        assert_eq!(whole.extended_clamped(1, 9), whole);
    }

    #[test]
    fn interior_extension_grows_by_one() {
        let r = IndexRange::new(4, 5).unwrap();
        assert_eq!(r.extended_clamped(1, 9), IndexRange::new(3, 6).unwrap());
    }

    #[test]
    fn deserialize_rejects_inverted_bounds() {
        let ok: IndexRange = serde_json::from_str(r#"{"start":1,"end":4}"#).unwrap();
        assert_eq!(ok, IndexRange::new(1, 4).unwrap());
        assert!(serde_json::from_str::<IndexRange>(r#"{"start":4,"end":1}"#).is_err());
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(IndexRange::new(0, 2).unwrap().to_string(), "(0, 2)");
    }
}
