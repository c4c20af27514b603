//! Previous-tour state and feature lookup.
//!
//! The state maps every person of the population to the alternative of
//! their most recently scheduled tour. It is created once per run, read
//! and written only by passes, and dropped when the run ends.
//!
//! A person with no scheduled tour yet maps to `None`. Their tours see no
//! `*_previous` columns at all, rather than the slot of some placeholder
//! alternative.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

use crate::choice::TourChoice;
use crate::error::{Result, ScheduleError};
use crate::models::{Alternative, AlternativeSet, Tour, END_COLUMN, START_COLUMN};

/// Alternative columns exposed to later tours.
pub const PREVIOUS_COLUMNS: [&str; 2] = [START_COLUMN, END_COLUMN];

/// Suffix marking a column as belonging to the previous tour.
pub const PREVIOUS_SUFFIX: &str = "_previous";

/// Name of the previous-tour version of a column (`start` → `start_previous`).
pub fn previous_column(column: &str) -> String {
    format!("{column}{PREVIOUS_SUFFIX}")
}

/// Slot of a person's previous tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousTourFeatures {
    /// Start period of the previous tour.
    pub start: i64,
    /// End period of the previous tour.
    pub end: i64,
}

impl PreviousTourFeatures {
    /// Reads the previous-tour columns of an alternative.
    pub fn from_alternative(alternative: &Alternative) -> Self {
        Self {
            start: alternative.start,
            end: alternative.end,
        }
    }

    /// `(column, value)` pairs under their suffixed names.
    pub fn columns(&self) -> [(String, f64); 2] {
        [
            (previous_column(START_COLUMN), self.start as f64),
            (previous_column(END_COLUMN), self.end as f64),
        ]
    }
}

/// Most recent alternative per person.
#[derive(Debug, Clone, Default)]
pub struct PreviousTourState {
    by_person: HashMap<String, Option<u32>>,
}

impl PreviousTourState {
    /// Initializes every person with "no previous tour".
    pub fn new<I, P>(person_ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            by_person: person_ids.into_iter().map(|p| (p.into(), None)).collect(),
        }
    }

    /// Previous alternative of a person.
    ///
    /// `None` for unknown persons, `Some(None)` for persons without a
    /// scheduled tour yet.
    pub fn get(&self, person_id: &str) -> Option<Option<u32>> {
        self.by_person.get(person_id).copied()
    }

    /// Records a person's newly chosen alternative, overwriting the
    /// previous one.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownPerson`] if the person was not part of the
    /// population the state was created for.
    pub fn record(&mut self, person_id: &str, choice: &TourChoice) -> Result<()> {
        let entry = self
            .by_person
            .get_mut(person_id)
            .ok_or_else(|| ScheduleError::UnknownPerson {
                tour_id: choice.tour_id.clone(),
                person_id: person_id.to_string(),
            })?;
        *entry = Some(choice.alternative_id);
        Ok(())
    }

    /// Number of tracked persons.
    pub fn len(&self) -> usize {
        self.by_person.len()
    }

    /// Whether no person is tracked.
    pub fn is_empty(&self) -> bool {
        self.by_person.is_empty()
    }

    /// Number of persons with at least one scheduled tour.
    pub fn scheduled_count(&self) -> usize {
        self.by_person.values().filter(|v| v.is_some()).count()
    }
}

/// Looks up the previous-tour slot of each tour's person.
///
/// Pure lookup: the state is not modified. Output is aligned with `tours`.
pub fn previous_tour_features<B: Borrow<Tour>>(
    tours: &[B],
    state: &PreviousTourState,
    alternatives: &AlternativeSet,
) -> Result<Vec<Option<PreviousTourFeatures>>> {
    tours
        .iter()
        .map(|tour| {
            let tour = tour.borrow();
            let previous = state
                .get(&tour.person_id)
                .ok_or_else(|| ScheduleError::UnknownPerson {
                    tour_id: tour.id.clone(),
                    person_id: tour.person_id.clone(),
                })?;
            previous
                .map(|id| alternatives.require(id).map(PreviousTourFeatures::from_alternative))
                .transpose()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alts() -> AlternativeSet {
        AlternativeSet::from_windows(&[(0, 4), (4, 8), (8, 12), (12, 16)])
    }

    #[test]
    fn test_initial_state_has_no_previous() {
        let state = PreviousTourState::new(["p1", "p2", "p1"]);
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("p1"), Some(None));
        assert_eq!(state.get("ghost"), None);
        assert_eq!(state.scheduled_count(), 0);
    }

    #[test]
    fn test_record_overwrites() {
        let mut state = PreviousTourState::new(["p1"]);
        state.record("p1", &TourChoice::new("t1", 2)).unwrap();
        state.record("p1", &TourChoice::new("t2", 3)).unwrap();
        assert_eq!(state.get("p1"), Some(Some(3)));
        assert_eq!(state.scheduled_count(), 1);
    }

    #[test]
    fn test_record_unknown_person_fails() {
        let mut state = PreviousTourState::new(["p1"]);
        let err = state.record("ghost", &TourChoice::new("t9", 1)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::UnknownPerson { ref tour_id, ref person_id }
                if tour_id == "t9" && person_id == "ghost"
        ));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("ghost"), None);
    }

    #[test]
    fn test_features_lookup() {
        let mut state = PreviousTourState::new(["p1", "p2"]);
        state.record("p2", &TourChoice::new("b0", 2)).unwrap();
        let tours = vec![Tour::new("a", "p1"), Tour::new("b", "p2")];

        let features = previous_tour_features(&tours, &state, &alts()).unwrap();
        assert_eq!(features[0], None);
        assert_eq!(features[1], Some(PreviousTourFeatures { start: 8, end: 12 }));
        // Lookup leaves state untouched
        assert_eq!(state.get("p1"), Some(None));
    }

    #[test]
    fn test_features_accept_borrowed_tours() {
        let state = PreviousTourState::new(["p1"]);
        let tour = Tour::new("a", "p1");
        let features = previous_tour_features(&[&tour], &state, &alts()).unwrap();
        assert_eq!(features, vec![None]);
    }

    #[test]
    fn test_unknown_person_fails() {
        let state = PreviousTourState::new(["p1"]);
        let err = previous_tour_features(&[Tour::new("a", "p9")], &state, &alts()).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownPerson { ref person_id, .. } if person_id == "p9"));
    }

    #[test]
    fn test_unknown_alternative_fails() {
        let mut state = PreviousTourState::new(["p1"]);
        state.record("p1", &TourChoice::new("a0", 42)).unwrap();
        let err = previous_tour_features(&[Tour::new("a", "p1")], &state, &alts()).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownAlternative(42)));
    }

    #[test]
    fn test_previous_columns() {
        assert_eq!(previous_column("start"), "start_previous");
        let cols = PreviousTourFeatures { start: 4, end: 8 }.columns();
        assert_eq!(cols[0], ("start_previous".to_string(), 4.0));
        assert_eq!(cols[1], ("end_previous".to_string(), 8.0));
        assert_eq!(PREVIOUS_COLUMNS, ["start", "end"]);
    }
}
