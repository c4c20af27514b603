//! Error types for tour scheduling.
//!
//! Every fault here is fatal to a scheduling run. Scheduling is
//! deterministic, so a retry would reproduce the same fault; callers are
//! expected to validate upstream data instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Main error type for scheduling operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The tour population is empty.
    #[error("Tour population is empty")]
    EmptyPopulation,

    /// Input integrity checks failed.
    #[error("Invalid input: {}", join_validation(.0))]
    InvalidInput(Vec<ValidationError>),

    /// Two tours of the same person landed in one scheduling pass.
    #[error("[{label}] person '{person_id}' has more than one tour in a single pass")]
    DuplicatePersonInBatch { person_id: String, label: String },

    /// A tour references a person missing from the person table.
    #[error("Tour '{tour_id}' references unknown person '{person_id}'")]
    UnknownPerson { tour_id: String, person_id: String },

    /// Per-category scheduling was requested but a tour has no category.
    #[error("Tour '{tour_id}' has no category")]
    MissingCategory { tour_id: String },

    /// A tour's category has no utility spec.
    #[error("Tour '{tour_id}' has category '{category}' with no spec")]
    UnknownCategory { tour_id: String, category: String },

    /// No alternative remains available for a tour.
    #[error("[{label}] no available alternative for tour '{tour_id}' (person '{person_id}')")]
    Infeasible {
        tour_id: String,
        person_id: String,
        label: String,
    },

    /// The choice evaluator broke its one-choice-per-chooser contract.
    #[error("Choice evaluator contract violated: {0}")]
    EvaluatorContract(String),

    /// An alternative id is not part of the alternative set.
    #[error("Unknown alternative id {0}")]
    UnknownAlternative(u32),

    /// A utility term references a variable that does not exist.
    #[error("Unknown variable '{name}' for tour '{tour_id}'")]
    UnknownVariable { name: String, tour_id: String },

    /// The timetable rejected a query or commit.
    #[error(transparent)]
    Timetable(#[from] TimetableError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by a [`Timetable`](crate::timetable::Timetable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// The person is not tracked by the timetable.
    #[error("Timetable has no person '{0}'")]
    UnknownPerson(String),

    /// The alternative is not known to the timetable.
    #[error("Timetable has no alternative {0}")]
    UnknownAlternative(u32),

    /// Person and alternative arrays differ in length.
    #[error("Parallel arrays differ in length: {persons} persons, {alternatives} alternatives")]
    LengthMismatch { persons: usize, alternatives: usize },

    /// An assignment overlaps an already occupied period.
    #[error("Alternative {alternative_id} overlaps existing tours of person '{person_id}'")]
    Conflict {
        person_id: String,
        alternative_id: u32,
    },

    /// The alternatives span more periods than a grid can index.
    #[error("Period span {first}..={last} is too large for a timetable")]
    PeriodSpan { first: i64, last: i64 },

    /// The timetable was already finalized.
    #[error("Timetable is finalized")]
    Finalized,
}

/// Result type alias for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
