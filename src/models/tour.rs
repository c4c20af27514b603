//! Tour model.
//!
//! A tour is one schedulable activity instance belonging to a person. Its
//! `tour_num` orders it among that person's tours: tour 2 is scheduled only
//! after tour 1 has been committed.

use serde::{Deserialize, Serialize};

use super::Attributes;

/// A tour to be placed into one time-of-day alternative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// Unique tour identifier.
    pub id: String,
    /// Owning person.
    pub person_id: String,
    /// Position among the person's tours (1-based).
    pub tour_num: u32,
    /// Tour category (e.g. "work", "escort"), used for per-category specs.
    pub category: Option<String>,
    /// Numeric chooser attributes visible to utility terms.
    pub attributes: Attributes,
}

impl Tour {
    /// Creates the first tour of a person, without category.
    pub fn new(id: impl Into<String>, person_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            person_id: person_id.into(),
            tour_num: 1,
            category: None,
            attributes: Attributes::new(),
        }
    }

    /// Sets the tour number.
    pub fn with_tour_num(mut self, tour_num: u32) -> Self {
        self.tour_num = tour_num;
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Adds a numeric attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
