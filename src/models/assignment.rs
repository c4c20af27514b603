//! Scheduling result model.
//!
//! A `TourSchedule` holds exactly one `TourAssignment` per scheduled tour,
//! with the chosen alternative expanded into its start/end/duration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Alternative, Tour};

/// A tour placed into one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourAssignment {
    /// Scheduled tour.
    pub tour_id: String,
    /// Owning person (denormalized for query convenience).
    pub person_id: String,
    /// Tour number of the scheduled tour.
    pub tour_num: u32,
    /// Category of the scheduled tour.
    pub category: Option<String>,
    /// Chosen alternative index.
    pub alternative_id: u32,
    /// Start period of the chosen alternative.
    pub start: i64,
    /// End period of the chosen alternative.
    pub end: i64,
    /// Duration of the chosen alternative.
    pub duration: i64,
}

impl TourAssignment {
    /// Expands a choice into an assignment by copying the alternative's slot.
    pub fn from_choice(tour: &Tour, alternative: &Alternative) -> Self {
        Self {
            tour_id: tour.id.clone(),
            person_id: tour.person_id.clone(),
            tour_num: tour.tour_num,
            category: tour.category.clone(),
            alternative_id: alternative.id,
            start: alternative.start,
            end: alternative.end,
            duration: alternative.duration(),
        }
    }

    /// Whether two assignments share any interior period.
    ///
    /// Touching boundaries (one ends where the next starts) do not count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Final per-tour assignments, indexed by tour id.
///
/// Iteration follows pass order (tour number ascending, then category).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TourSchedule {
    assignments: Vec<TourAssignment>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TourSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment. Returns `false` if the tour was already present.
    pub fn add_assignment(&mut self, assignment: TourAssignment) -> bool {
        if self.index.contains_key(&assignment.tour_id) {
            return false;
        }
        self.index
            .insert(assignment.tour_id.clone(), self.assignments.len());
        self.assignments.push(assignment);
        true
    }

    /// Assignment for a tour.
    pub fn get(&self, tour_id: &str) -> Option<&TourAssignment> {
        self.index.get(tour_id).map(|&i| &self.assignments[i])
    }

    /// All assignments of one person, in scheduling order.
    pub fn assignments_for_person(&self, person_id: &str) -> Vec<&TourAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id)
            .collect()
    }

    /// Iterates assignments in scheduling order.
    pub fn iter(&self) -> std::slice::Iter<'_, TourAssignment> {
        self.assignments.iter()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl<'a> IntoIterator for &'a TourSchedule {
    type Item = &'a TourAssignment;
    type IntoIter = std::slice::Iter<'a, TourAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(tour_id: &str, person_id: &str, alt: &Alternative) -> TourAssignment {
        TourAssignment::from_choice(&Tour::new(tour_id, person_id), alt)
    }

    fn sample_schedule() -> TourSchedule {
        let mut s = TourSchedule::new();
        s.add_assignment(assignment("t1", "p1", &Alternative::new(0, 0, 4)));
        s.add_assignment(assignment("t2", "p1", &Alternative::new(1, 4, 8)));
        s.add_assignment(assignment("t3", "p2", &Alternative::new(0, 0, 4)));
        s
    }

    #[test]
    fn test_from_choice_copies_slot() {
        let tour = Tour::new("t1", "p1").with_tour_num(2).with_category("shop");
        let alt = Alternative::new(7, 9, 13);
        let a = TourAssignment::from_choice(&tour, &alt);
        assert_eq!(a.alternative_id, 7);
        assert_eq!((a.start, a.end, a.duration), (9, 13, 4));
        assert_eq!(a.tour_num, 2);
        assert_eq!(a.category.as_deref(), Some("shop"));
    }

    #[test]
    fn test_lookup_by_tour() {
        let s = sample_schedule();
        assert_eq!(s.len(), 3);
        assert_eq!(s.get("t2").unwrap().start, 4);
        assert!(s.get("t9").is_none());
    }

    #[test]
    fn test_duplicate_tour_rejected() {
        let mut s = sample_schedule();
        assert!(!s.add_assignment(assignment("t1", "p1", &Alternative::new(3, 12, 16))));
        assert_eq!(s.len(), 3);
        assert_eq!(s.get("t1").unwrap().alternative_id, 0);
    }

    #[test]
    fn test_assignments_for_person() {
        let s = sample_schedule();
        let p1 = s.assignments_for_person("p1");
        assert_eq!(p1.len(), 2);
        assert!(!p1[0].overlaps(p1[1]));
    }

    #[test]
    fn test_overlap() {
        let a = assignment("a", "p", &Alternative::new(0, 0, 4));
        let b = assignment("b", "p", &Alternative::new(1, 3, 6));
        let c = assignment("c", "p", &Alternative::new(2, 4, 6));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_serialize() {
        let s = sample_schedule();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["assignments"].as_array().unwrap().len(), 3);
        assert_eq!(json["assignments"][0]["tour_id"], "t1");
        assert!(json.get("index").is_none());
    }
}
