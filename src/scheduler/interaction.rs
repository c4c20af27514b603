//! Tour × alternative interaction dataset.
//!
//! # Algorithm
//!
//! 1. Tile the alternatives once per chooser (chooser-major, alternative
//!    minor) into parallel person-id / alternative-id arrays.
//! 2. Ask the timetable for the availability of the whole cross product in
//!    one call.
//! 3. Keep the available rows. The person-id column is discarded; a row
//!    reaches its person through its chooser.
//! 4. Fail if any chooser is left without a row.
//!
//! # Complexity
//! O(n * m) rows before filtering, n = choosers, m = alternatives.

use std::ops::Range;

use tracing::debug;

use crate::choice::Chooser;
use crate::error::{Result, ScheduleError, TimetableError};
use crate::models::{Alternative, AlternativeSet};
use crate::timetable::Timetable;

/// One available (chooser, alternative) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRow<'a> {
    /// Position of the chooser in the evaluated batch.
    pub chooser: usize,
    /// Candidate alternative.
    pub alternative: &'a Alternative,
}

/// Availability-filtered cross product of choosers and alternatives.
///
/// Callers may only rely on the (tour, alternative id) pairing, not on row
/// order.
#[derive(Debug, Clone)]
pub struct InteractionDataset<'a> {
    choosers: &'a [Chooser],
    choice_column: String,
    rows: Vec<InteractionRow<'a>>,
    spans: Vec<Range<usize>>,
}

impl<'a> InteractionDataset<'a> {
    /// All rows.
    pub fn rows(&self) -> &[InteractionRow<'a>] {
        &self.rows
    }

    /// Rows of one chooser.
    pub fn rows_for(&self, chooser: usize) -> &[InteractionRow<'a>] {
        self.spans
            .get(chooser)
            .map(|span| &self.rows[span.clone()])
            .unwrap_or(&[])
    }

    /// Whether a chooser may pick the alternative.
    pub fn contains(&self, chooser: usize, alternative_id: u32) -> bool {
        self.rows_for(chooser)
            .iter()
            .any(|row| row.alternative.id == alternative_id)
    }

    /// Tour id of a row.
    pub fn tour_id(&self, row: &InteractionRow<'_>) -> &str {
        &self.choosers[row.chooser].tour_id
    }

    /// `(tour id, alternative id)` pairs of all rows.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.rows
            .iter()
            .map(move |row| (self.tour_id(row), row.alternative.id))
    }

    /// Reads a row column: the choice column yields the alternative id,
    /// anything else is an alternative column.
    pub fn value(&self, row: &InteractionRow<'_>, column: &str) -> Option<f64> {
        if column == self.choice_column {
            return Some(row.alternative.id as f64);
        }
        row.alternative.value(column)
    }

    /// Name of the choice column.
    pub fn choice_column(&self) -> &str {
        &self.choice_column
    }

    /// Choosers the rows refer to.
    pub fn choosers(&self) -> &'a [Chooser] {
        self.choosers
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the availability-filtered interaction dataset.
///
/// # Errors
/// - [`ScheduleError::Infeasible`] if a chooser has no available alternative.
/// - [`ScheduleError::Timetable`] if the timetable query fails or returns a
///   mask of the wrong length.
pub fn build_interactions<'a, T: Timetable>(
    choosers: &'a [Chooser],
    alternatives: &'a AlternativeSet,
    timetable: &T,
    choice_column: &str,
    trace_label: &str,
) -> Result<InteractionDataset<'a>> {
    let alts = alternatives.as_slice();
    let total = choosers.len() * alts.len();

    let mut person_ids: Vec<&str> = Vec::with_capacity(total);
    let mut alternative_ids: Vec<u32> = Vec::with_capacity(total);
    for chooser in choosers {
        for alt in alts {
            person_ids.push(&chooser.person_id);
            alternative_ids.push(alt.id);
        }
    }

    let available = timetable.available(&person_ids, &alternative_ids)?;
    if available.len() != total {
        return Err(TimetableError::LengthMismatch {
            persons: total,
            alternatives: available.len(),
        }
        .into());
    }

    let mut rows = Vec::new();
    let mut spans = Vec::with_capacity(choosers.len());
    for (pos, chooser) in choosers.iter().enumerate() {
        let begin = rows.len();
        let mask = &available[pos * alts.len()..(pos + 1) * alts.len()];
        for (alt, _) in alts.iter().zip(mask).filter(|&(_, &ok)| ok) {
            rows.push(InteractionRow {
                chooser: pos,
                alternative: alt,
            });
        }
        if rows.len() == begin {
            return Err(ScheduleError::Infeasible {
                tour_id: chooser.tour_id.clone(),
                person_id: chooser.person_id.clone(),
                label: trace_label.to_string(),
            });
        }
        spans.push(begin..rows.len());
    }

    debug!(
        label = trace_label,
        choosers = choosers.len(),
        cross_product = total,
        available = rows.len(),
        "built interaction dataset"
    );

    Ok(InteractionDataset {
        choosers,
        choice_column: choice_column.to_string(),
        rows,
        spans,
    })
}
