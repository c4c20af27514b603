//! Shared test fixtures for scheduler tests.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::choice::{ChoiceEvaluator, Chooser, EvaluationContext, TourChoice};
use crate::error::{Result, TimetableError};
use crate::models::AlternativeSet;
use crate::scheduler::InteractionDataset;
use crate::timetable::Timetable;

/// Four half-day slots: (0,4), (4,8), (8,12), (12,16) with ids 0..=3.
pub(crate) fn half_day_alternatives() -> AlternativeSet {
    AlternativeSet::from_windows(&[(0, 4), (4, 8), (8, 12), (12, 16)])
}

/// A first-tour chooser with no attributes.
pub(crate) fn chooser(tour_id: &str, person_id: &str) -> Chooser {
    Chooser {
        tour_id: tour_id.into(),
        person_id: person_id.into(),
        tour_num: 1,
        category: None,
        attributes: Default::default(),
        previous: None,
    }
}

/// Timetable whose availability is scripted per (person, alternative).
///
/// Every pair is available unless blocked; assigned pairs become blocked.
/// Records call sizes so tests can assert on the interaction protocol.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTimetable {
    blocked: HashSet<(String, u32)>,
    available_calls: RefCell<Vec<usize>>,
    reject_assign: bool,
    pub(crate) assigned: Vec<Vec<(String, u32)>>,
    pub(crate) finalize_calls: usize,
}

impl ScriptedTimetable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn block(mut self, person_id: &str, alternative_id: u32) -> Self {
        self.blocked.insert((person_id.to_string(), alternative_id));
        self
    }

    pub(crate) fn block_all(mut self, person_id: &str, alternatives: &AlternativeSet) -> Self {
        for alt in alternatives {
            self.blocked.insert((person_id.to_string(), alt.id));
        }
        self
    }

    /// Makes every `assign` fail with a conflict on its first pair.
    pub(crate) fn rejecting_assign(mut self) -> Self {
        self.reject_assign = true;
        self
    }

    pub(crate) fn available_calls(&self) -> Vec<usize> {
        self.available_calls.borrow().clone()
    }
}

impl Timetable for ScriptedTimetable {
    fn available<P: AsRef<str>>(
        &self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> std::result::Result<Vec<bool>, TimetableError> {
        self.available_calls.borrow_mut().push(person_ids.len());
        Ok(person_ids
            .iter()
            .zip(alternative_ids)
            .map(|(p, &a)| !self.blocked.contains(&(p.as_ref().to_string(), a)))
            .collect())
    }

    fn assign<P: AsRef<str>>(
        &mut self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> std::result::Result<(), TimetableError> {
        if self.reject_assign {
            return Err(TimetableError::Conflict {
                person_id: person_ids.first().map(|p| p.as_ref().to_string()).unwrap_or_default(),
                alternative_id: alternative_ids.first().copied().unwrap_or_default(),
            });
        }
        let batch: Vec<(String, u32)> = person_ids
            .iter()
            .zip(alternative_ids)
            .map(|(p, &a)| (p.as_ref().to_string(), a))
            .collect();
        self.blocked.extend(batch.iter().cloned());
        self.assigned.push(batch);
        Ok(())
    }

    fn finalize(&mut self) -> std::result::Result<(), TimetableError> {
        self.finalize_calls += 1;
        Ok(())
    }

    fn adjacent_window_before(&self, _: &str, _: i64) -> std::result::Result<i64, TimetableError> {
        Ok(0)
    }

    fn adjacent_window_after(&self, _: &str, _: i64) -> std::result::Result<i64, TimetableError> {
        Ok(0)
    }

    fn previous_tour_ends(&self, _: &str, _: i64) -> std::result::Result<bool, TimetableError> {
        Ok(false)
    }

    fn previous_tour_begins(&self, _: &str, _: i64) -> std::result::Result<bool, TimetableError> {
        Ok(false)
    }
}

/// Picks each chooser's first available row and remembers what it saw.
#[derive(Debug, Default)]
pub(crate) struct FirstAvailable {
    pub(crate) seen: Vec<Chooser>,
    pub(crate) batches: Vec<usize>,
}

impl ChoiceEvaluator for FirstAvailable {
    type Spec = ();

    fn name(&self) -> &'static str {
        "first-available"
    }

    fn evaluate<T: Timetable>(
        &mut self,
        choosers: &[Chooser],
        interactions: &InteractionDataset<'_>,
        _spec: &(),
        _context: &EvaluationContext<'_, T>,
    ) -> Result<Vec<TourChoice>> {
        self.batches.push(choosers.len());
        self.seen.extend(choosers.iter().cloned());
        Ok(choosers
            .iter()
            .enumerate()
            .map(|(pos, c)| TourChoice::new(c.tour_id.clone(), interactions.rows_for(pos)[0].alternative.id))
            .collect())
    }
}

/// Returns a canned answer regardless of input.
#[derive(Debug)]
pub(crate) struct Canned(pub(crate) Vec<TourChoice>);

impl ChoiceEvaluator for Canned {
    type Spec = ();

    fn name(&self) -> &'static str {
        "canned"
    }

    fn evaluate<T: Timetable>(
        &mut self,
        _choosers: &[Chooser],
        _interactions: &InteractionDataset<'_>,
        _spec: &(),
        _context: &EvaluationContext<'_, T>,
    ) -> Result<Vec<TourChoice>> {
        Ok(self.0.clone())
    }
}
