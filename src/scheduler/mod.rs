//! Sequential tour scheduling.
//!
//! # Algorithm
//!
//! Tours are scheduled in passes, one per tour number (1st tours, then 2nd
//! tours, …) and optionally one per category within a tour number. Each
//! pass:
//!
//! 1. joins person attributes and previous-tour features onto its tours,
//! 2. builds the tour × alternative cross product filtered by the timetable,
//! 3. asks a [`ChoiceEvaluator`](crate::choice::ChoiceEvaluator) for one
//!    alternative per tour,
//! 4. commits the choices to the timetable and the previous-tour state.
//!
//! A pass never holds two tours of the same person, so the timetable only
//! ever sees one pending assignment per person.
//!
//! # References
//!
//! - Vovsha & Bradley (2004), "Hybrid Discrete Choice Departure-Time and
//!   Duration Model for Scheduling Travel Tours"
//! - Bowman & Ben-Akiva (2001), "Activity-based disaggregate travel demand
//!   model system with activity schedules"

mod interaction;
mod orchestrator;
mod pass;
mod previous;
#[cfg(test)]
pub(crate) mod testing;

pub use interaction::{build_interactions, InteractionDataset, InteractionRow};
pub use orchestrator::{
    extend_trace_label, plan_passes, schedule_population, PlannedPass, ScheduleRequest,
    TourScheduler,
};
pub use pass::{run_pass, PassContext};
pub use previous::{
    previous_column, previous_tour_features, PreviousTourFeatures, PreviousTourState,
    PREVIOUS_COLUMNS, PREVIOUS_SUFFIX,
};
