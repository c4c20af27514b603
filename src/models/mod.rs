//! Tour scheduling domain models.
//!
//! # Domain Mappings
//!
//! | tour-schedule | Travel demand | Appointments |
//! |---------------|---------------|--------------|
//! | Tour | Tour / trip chain | Visit |
//! | Alternative | Departure/arrival window | Slot |
//! | PersonTable | Synthetic population | Patients |
//! | TourSchedule | Tour time-of-day choices | Booking list |

mod alternative;
mod assignment;
mod person;
mod tour;

pub use alternative::{Alternative, AlternativeSet, DURATION_COLUMN, END_COLUMN, START_COLUMN};
pub use assignment::{TourAssignment, TourSchedule};
pub use person::PersonTable;
pub use tour::Tour;

use std::collections::HashMap;

/// Numeric attributes keyed by column name.
pub type Attributes = HashMap<String, f64>;

/// Named constants bound for utility evaluation.
pub type Constants = HashMap<String, f64>;
