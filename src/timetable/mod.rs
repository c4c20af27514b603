//! Per-person time-occupancy tracking.
//!
//! The timetable is the only shared mutable resource of a scheduling run.
//! Passes query it to filter alternatives and commit their choices into it;
//! a query issued after a commit must observe that commit.
//!
//! # Usage
//!
//! ```
//! use tour_schedule::models::AlternativeSet;
//! use tour_schedule::timetable::{PersonTimetable, Timetable};
//!
//! let alts = AlternativeSet::from_windows(&[(0, 4), (4, 8), (2, 6)]);
//! let mut tt = PersonTimetable::new(["p1"], &alts).unwrap();
//!
//! tt.assign(&["p1"], &[0]).unwrap();
//! let mask = tt.available(&["p1", "p1", "p1"], &[0, 1, 2]).unwrap();
//! assert_eq!(mask, vec![false, true, false]);
//! ```

mod person_timetable;

pub use person_timetable::{Occupancy, PersonTimetable};

use crate::error::TimetableError;

/// Shared per-person occupancy resource.
///
/// Person and alternative arguments are parallel arrays: element `i` of
/// each describes one candidate (person, alternative) pair.
pub trait Timetable {
    /// Availability mask for each (person, alternative) pair. Never mutates.
    fn available<P: AsRef<str>>(
        &self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> Result<Vec<bool>, TimetableError>;

    /// Marks each (person, alternative) pair as occupied.
    ///
    /// Called once per pass with the whole batch.
    fn assign<P: AsRef<str>>(
        &mut self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> Result<(), TimetableError>;

    /// Publishes the final state. Called exactly once per full run.
    fn finalize(&mut self) -> Result<(), TimetableError>;

    /// Number of free periods immediately before `period`.
    fn adjacent_window_before(&self, person_id: &str, period: i64) -> Result<i64, TimetableError>;

    /// Number of free periods immediately after `period`.
    fn adjacent_window_after(&self, person_id: &str, period: i64) -> Result<i64, TimetableError>;

    /// Whether an already scheduled tour of the person ends in `period`.
    fn previous_tour_ends(&self, person_id: &str, period: i64) -> Result<bool, TimetableError>;

    /// Whether an already scheduled tour of the person begins in `period`.
    fn previous_tour_begins(&self, person_id: &str, period: i64) -> Result<bool, TimetableError>;
}
