//! Time-of-day alternatives.
//!
//! An alternative is one candidate slot `[start, end]` on a discrete period
//! axis (e.g. hours 5..23). Periods are inclusive on both ends: a tour
//! ending in period 8 and a tour starting in period 8 share that period.
//!
//! # Reference
//! Vovsha & Bradley (2004), "Hybrid Discrete Choice Departure-Time and
//! Duration Model for Scheduling Travel Tours"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Attributes;
use crate::error::{Result, ScheduleError};

/// Column name of the start period.
pub const START_COLUMN: &str = "start";
/// Column name of the end period.
pub const END_COLUMN: &str = "end";
/// Column name of the derived duration.
pub const DURATION_COLUMN: &str = "duration";

/// One candidate time-of-day slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// Stable alternative index.
    pub id: u32,
    /// Start period (inclusive).
    pub start: i64,
    /// End period (inclusive).
    pub end: i64,
    /// Extra numeric attributes (e.g. "early_start", "peak").
    pub attributes: Attributes,
}

impl Alternative {
    /// Creates an alternative.
    pub fn new(id: u32, start: i64, end: i64) -> Self {
        Self {
            id,
            start,
            end,
            attributes: Attributes::new(),
        }
    }

    /// Adds a numeric attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Duration in periods.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Reads a column: `start`, `end`, `duration` or an extra attribute.
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            START_COLUMN => Some(self.start as f64),
            END_COLUMN => Some(self.end as f64),
            DURATION_COLUMN => Some(self.duration() as f64),
            _ => self.attributes.get(column).copied(),
        }
    }
}

/// The ordered, shared set of alternatives.
#[derive(Debug, Clone, Default)]
pub struct AlternativeSet {
    alternatives: Vec<Alternative>,
    index: HashMap<u32, usize>,
}

impl AlternativeSet {
    /// Creates a set from alternatives, keeping their order.
    ///
    /// On duplicate ids the later alternative wins the id lookup;
    /// `validate_population` reports the duplicate.
    pub fn new(alternatives: Vec<Alternative>) -> Self {
        let index = alternatives
            .iter()
            .enumerate()
            .map(|(pos, alt)| (alt.id, pos))
            .collect();
        Self {
            alternatives,
            index,
        }
    }

    /// Builds alternatives from `(start, end)` pairs, numbered from 0.
    pub fn from_windows(windows: &[(i64, i64)]) -> Self {
        Self::new(
            windows
                .iter()
                .enumerate()
                .map(|(i, &(start, end))| Alternative::new(i as u32, start, end))
                .collect(),
        )
    }

    /// Every `[start, end]` with `first <= start <= end <= last`, the usual
    /// departure/arrival grid.
    pub fn all_windows(first: i64, last: i64) -> Self {
        let mut windows = Vec::new();
        for start in first..=last {
            for end in start..=last {
                windows.push((start, end));
            }
        }
        Self::from_windows(&windows)
    }

    /// Looks up an alternative by id.
    pub fn get(&self, id: u32) -> Option<&Alternative> {
        self.index.get(&id).map(|&pos| &self.alternatives[pos])
    }

    /// Looks up an alternative by id, failing on unknown ids.
    pub fn require(&self, id: u32) -> Result<&Alternative> {
        self.get(id).ok_or(ScheduleError::UnknownAlternative(id))
    }

    /// The first alternative in set order.
    pub fn first(&self) -> Option<&Alternative> {
        self.alternatives.first()
    }

    /// Alternatives in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, Alternative> {
        self.alternatives.iter()
    }

    /// Alternatives as a slice.
    pub fn as_slice(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Earliest start and latest end across all alternatives.
    pub fn period_span(&self) -> Option<(i64, i64)> {
        let first = self.alternatives.iter().map(|a| a.start.min(a.end)).min()?;
        let last = self.alternatives.iter().map(|a| a.start.max(a.end)).max()?;
        Some((first, last))
    }
}

impl<'a> IntoIterator for &'a AlternativeSet {
    type Item = &'a Alternative;
    type IntoIter = std::slice::Iter<'a, Alternative>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_columns() {
        let alt = Alternative::new(3, 8, 12).with_attribute("peak", 1.0);
        assert_eq!(alt.duration(), 4);
        assert_eq!(alt.value("start"), Some(8.0));
        assert_eq!(alt.value("end"), Some(12.0));
        assert_eq!(alt.value("duration"), Some(4.0));
        assert_eq!(alt.value("peak"), Some(1.0));
        assert_eq!(alt.value("missing"), None);
    }

    #[test]
    fn test_from_windows() {
        let alts = AlternativeSet::from_windows(&[(0, 4), (4, 8), (8, 12)]);
        assert_eq!(alts.len(), 3);
        assert_eq!(alts.first().unwrap().id, 0);
        assert_eq!(alts.get(2).unwrap().start, 8);
        assert!(alts.get(3).is_none());
        assert!(matches!(
            alts.require(9),
            Err(ScheduleError::UnknownAlternative(9))
        ));
    }

    #[test]
    fn test_all_windows() {
        // 3 periods → 3 + 2 + 1 windows
        let alts = AlternativeSet::all_windows(5, 7);
        assert_eq!(alts.len(), 6);
        assert!(alts.iter().all(|a| a.duration() >= 0));
        assert_eq!(alts.period_span(), Some((5, 7)));
    }

    #[test]
    fn test_non_contiguous_ids() {
        let alts = AlternativeSet::new(vec![
            Alternative::new(10, 0, 1),
            Alternative::new(20, 1, 2),
        ]);
        assert_eq!(alts.get(20).unwrap().start, 1);
        assert_eq!(alts.first().unwrap().id, 10);
    }

    #[test]
    fn test_empty_set() {
        let alts = AlternativeSet::default();
        assert!(alts.is_empty());
        assert!(alts.first().is_none());
        assert!(alts.period_span().is_none());
    }
}
