//! Sequential time-of-day tour scheduling.
//!
//! Assigns every tour in a population to one discrete start/end window
//! ("alternative"), processing tours in ascending per-person sequence so that
//! later tours see the outcome of earlier ones. Two mechanisms couple the
//! passes:
//!
//! - a shared [`Timetable`](timetable::Timetable) that forbids overlapping
//!   windows for one person
//! - previous-tour features (`start_previous`, `end_previous`) joined onto
//!   the choosers of each later pass
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Tour`, `PersonTable`, `Alternative`,
//!   `AlternativeSet`, `TourAssignment`, `TourSchedule`
//! - **`scheduler`**: Orchestrator, scheduling pass, interaction builder and
//!   previous-tour state
//! - **`choice`**: `ChoiceEvaluator` boundary and a reference multinomial
//!   logit evaluator
//! - **`timetable`**: `Timetable` boundary and an in-memory per-person grid
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   persons, malformed alternatives)
//! - **`config`**: TOML-loadable run settings
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use tour_schedule::choice::{LogitEvaluator, SpecSelector, UtilitySpec};
//! use tour_schedule::models::{AlternativeSet, PersonTable, Tour};
//! use tour_schedule::scheduler::{ScheduleRequest, TourScheduler};
//! use tour_schedule::timetable::PersonTimetable;
//!
//! let alternatives = AlternativeSet::from_windows(&[(0, 1), (1, 2), (2, 3)]);
//! let persons = PersonTable::new().with_person("P1");
//! let tours = vec![
//!     Tour::new("t1", "P1"),
//!     Tour::new("t2", "P1").with_tour_num(2),
//! ];
//! let request = ScheduleRequest::new(
//!     tours,
//!     persons,
//!     alternatives.clone(),
//!     SpecSelector::Uniform(UtilitySpec::new()),
//! );
//!
//! let mut timetable = PersonTimetable::new(["P1"], &alternatives).unwrap();
//! let mut scheduler = TourScheduler::new(LogitEvaluator::max_utility());
//! let schedule = scheduler.schedule(&request, &mut timetable).unwrap();
//! assert_eq!(schedule.len(), 2);
//! ```
//!
//! # References
//!
//! - Vovsha & Bradley (2004), "Hybrid Discrete Choice Departure-Time and
//!   Duration Model for Scheduling Travel Tours"
//! - Train (2009), "Discrete Choice Methods with Simulation"

pub mod choice;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod timetable;
pub mod validation;

pub use error::{Result, ScheduleError};
