//! In-memory per-person period grid.
//!
//! Each person owns one row of `Occupancy` cells spanning every period
//! covered by the alternative set. A tour `[s, e]` marks `s` as a start,
//! `e` as an end and everything between as middle. Consecutive tours may
//! share a boundary period: one tour can start in the period where another
//! ends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Timetable;
use crate::error::TimetableError;
use crate::models::AlternativeSet;

/// State of one period in a person's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Occupancy {
    /// Nothing scheduled.
    #[default]
    Free,
    /// A tour starts here.
    Start,
    /// A tour ends here.
    End,
    /// A tour ends and another starts here, or a zero-length tour.
    StartEnd,
    /// Strictly inside a tour.
    Middle,
}

impl Occupancy {
    fn accepts_start(self) -> bool {
        matches!(self, Occupancy::Free | Occupancy::End)
    }

    fn accepts_end(self) -> bool {
        matches!(self, Occupancy::Free | Occupancy::Start)
    }

    fn with_start(self) -> Self {
        match self {
            Occupancy::End => Occupancy::StartEnd,
            _ => Occupancy::Start,
        }
    }

    fn with_end(self) -> Self {
        match self {
            Occupancy::Start => Occupancy::StartEnd,
            _ => Occupancy::End,
        }
    }
}

/// Per-person occupancy grid implementing [`Timetable`].
#[derive(Debug, Clone)]
pub struct PersonTimetable {
    first_period: i64,
    period_count: usize,
    windows: HashMap<u32, (i64, i64)>,
    rows: HashMap<String, Vec<Occupancy>>,
    finalized: bool,
}

impl PersonTimetable {
    /// Creates an empty grid for the given persons, spanning all periods
    /// used by `alternatives`.
    ///
    /// # Errors
    /// [`TimetableError::PeriodSpan`] if the period count overflows.
    pub fn new<I, P>(person_ids: I, alternatives: &AlternativeSet) -> Result<Self, TimetableError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let (first, last) = alternatives.period_span().unwrap_or((0, 0));
        let period_count = last
            .checked_sub(first)
            .and_then(|span| span.checked_add(1))
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(TimetableError::PeriodSpan { first, last })?;
        let windows = alternatives
            .iter()
            .map(|a| (a.id, (a.start, a.end)))
            .collect();
        let rows = person_ids
            .into_iter()
            .map(|p| (p.into(), vec![Occupancy::Free; period_count]))
            .collect();
        Ok(Self {
            first_period: first,
            period_count,
            windows,
            rows,
            finalized: false,
        })
    }

    /// Adds a person with an empty row. Existing rows are kept.
    pub fn add_person(&mut self, person_id: impl Into<String>) {
        let count = self.period_count;
        self.rows
            .entry(person_id.into())
            .or_insert_with(|| vec![Occupancy::Free; count]);
    }

    /// The occupancy row of a person, first period first.
    pub fn row(&self, person_id: &str) -> Option<&[Occupancy]> {
        self.rows.get(person_id).map(Vec::as_slice)
    }

    /// Occupancy of one period (`None` for unknown persons or periods
    /// outside the grid).
    pub fn occupancy(&self, person_id: &str, period: i64) -> Option<Occupancy> {
        let row = self.rows.get(person_id)?;
        self.cell(period).map(|i| row[i])
    }

    /// First period of the grid.
    pub fn first_period(&self) -> i64 {
        self.first_period
    }

    /// Whether `finalize` has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn cell(&self, period: i64) -> Option<usize> {
        let offset = period - self.first_period;
        if offset < 0 || offset as usize >= self.period_count {
            return None;
        }
        Some(offset as usize)
    }

    fn row_of(&self, person_id: &str) -> Result<&Vec<Occupancy>, TimetableError> {
        self.rows
            .get(person_id)
            .ok_or_else(|| TimetableError::UnknownPerson(person_id.to_string()))
    }

    fn window_of(&self, alternative_id: u32) -> Result<(usize, usize), TimetableError> {
        let &(start, end) = self
            .windows
            .get(&alternative_id)
            .ok_or(TimetableError::UnknownAlternative(alternative_id))?;
        match (self.cell(start), self.cell(end)) {
            (Some(s), Some(e)) if s <= e => Ok((s, e)),
            _ => Err(TimetableError::UnknownAlternative(alternative_id)),
        }
    }

    fn fits(row: &[Occupancy], s: usize, e: usize) -> bool {
        if s == e {
            return row[s] == Occupancy::Free;
        }
        row[s].accepts_start()
            && row[e].accepts_end()
            && row[s + 1..e].iter().all(|&c| c == Occupancy::Free)
    }

    fn mark(row: &mut [Occupancy], s: usize, e: usize) {
        if s == e {
            row[s] = Occupancy::StartEnd;
            return;
        }
        row[s] = row[s].with_start();
        for cell in &mut row[s + 1..e] {
            *cell = Occupancy::Middle;
        }
        row[e] = row[e].with_end();
    }

    fn check_lengths(persons: usize, alternatives: usize) -> Result<(), TimetableError> {
        if persons != alternatives {
            return Err(TimetableError::LengthMismatch {
                persons,
                alternatives,
            });
        }
        Ok(())
    }
}

impl Timetable for PersonTimetable {
    fn available<P: AsRef<str>>(
        &self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> Result<Vec<bool>, TimetableError> {
        Self::check_lengths(person_ids.len(), alternative_ids.len())?;
        person_ids
            .iter()
            .zip(alternative_ids)
            .map(|(person_id, &alt)| {
                let row = self.row_of(person_id.as_ref())?;
                let (s, e) = self.window_of(alt)?;
                Ok(Self::fits(row, s, e))
            })
            .collect()
    }

    fn assign<P: AsRef<str>>(
        &mut self,
        person_ids: &[P],
        alternative_ids: &[u32],
    ) -> Result<(), TimetableError> {
        if self.finalized {
            return Err(TimetableError::Finalized);
        }
        Self::check_lengths(person_ids.len(), alternative_ids.len())?;

        // Stage touched rows so a conflict leaves the grid untouched.
        let mut staged: HashMap<&str, Vec<Occupancy>> = HashMap::new();
        for (person_id, &alt) in person_ids.iter().zip(alternative_ids) {
            let person_id = person_id.as_ref();
            let (s, e) = self.window_of(alt)?;
            if !staged.contains_key(person_id) {
                let row = self.row_of(person_id)?.clone();
                staged.insert(person_id, row);
            }
            let row = staged
                .get_mut(person_id)
                .ok_or_else(|| TimetableError::UnknownPerson(person_id.to_string()))?;
            if !Self::fits(row, s, e) {
                return Err(TimetableError::Conflict {
                    person_id: person_id.to_string(),
                    alternative_id: alt,
                });
            }
            Self::mark(row, s, e);
        }

        for (person_id, row) in staged {
            self.rows.insert(person_id.to_string(), row);
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TimetableError> {
        if self.finalized {
            return Err(TimetableError::Finalized);
        }
        self.finalized = true;
        Ok(())
    }

    fn adjacent_window_before(&self, person_id: &str, period: i64) -> Result<i64, TimetableError> {
        let row = self.row_of(person_id)?;
        let mut count = 0;
        let mut p = period - 1;
        while let Some(i) = self.cell(p) {
            if row[i] != Occupancy::Free {
                break;
            }
            count += 1;
            p -= 1;
        }
        Ok(count)
    }

    fn adjacent_window_after(&self, person_id: &str, period: i64) -> Result<i64, TimetableError> {
        let row = self.row_of(person_id)?;
        let mut count = 0;
        let mut p = period + 1;
        while let Some(i) = self.cell(p) {
            if row[i] != Occupancy::Free {
                break;
            }
            count += 1;
            p += 1;
        }
        Ok(count)
    }

    fn previous_tour_ends(&self, person_id: &str, period: i64) -> Result<bool, TimetableError> {
        let row = self.row_of(person_id)?;
        Ok(self
            .cell(period)
            .is_some_and(|i| matches!(row[i], Occupancy::End | Occupancy::StartEnd)))
    }

    fn previous_tour_begins(&self, person_id: &str, period: i64) -> Result<bool, TimetableError> {
        let row = self.row_of(person_id)?;
        Ok(self
            .cell(period)
            .is_some_and(|i| matches!(row[i], Occupancy::Start | Occupancy::StartEnd)))
    }
}
