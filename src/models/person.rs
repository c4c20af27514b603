//! Person attribute table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Attributes;

/// Person attributes keyed by person id.
///
/// Joined onto tours before evaluation so utility terms can read
/// person-level variables (age, employment, income, …).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonTable {
    persons: HashMap<String, Attributes>,
}

impl PersonTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person with no attributes.
    pub fn with_person(mut self, person_id: impl Into<String>) -> Self {
        self.persons.entry(person_id.into()).or_default();
        self
    }

    /// Adds (or extends) a person with one attribute.
    pub fn with_attribute(
        mut self,
        person_id: impl Into<String>,
        key: impl Into<String>,
        value: f64,
    ) -> Self {
        self.insert_attribute(person_id, key, value);
        self
    }

    /// Inserts a person, replacing existing attributes.
    pub fn insert(&mut self, person_id: impl Into<String>, attributes: Attributes) {
        self.persons.insert(person_id.into(), attributes);
    }

    /// Sets one attribute of a person, creating the person if needed.
    pub fn insert_attribute(
        &mut self,
        person_id: impl Into<String>,
        key: impl Into<String>,
        value: f64,
    ) {
        self.persons
            .entry(person_id.into())
            .or_default()
            .insert(key.into(), value);
    }

    /// Attributes of a person.
    pub fn get(&self, person_id: &str) -> Option<&Attributes> {
        self.persons.get(person_id)
    }

    /// Whether the person exists.
    pub fn contains(&self, person_id: &str) -> bool {
        self.persons.contains_key(person_id)
    }

    /// Number of persons.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_table() {
        let persons = PersonTable::new()
            .with_attribute("p1", "age", 34.0)
            .with_attribute("p1", "is_worker", 1.0)
            .with_person("p2");

        assert_eq!(persons.len(), 2);
        assert_eq!(persons.get("p1").unwrap().get("age"), Some(&34.0));
        assert!(persons.get("p2").unwrap().is_empty());
        assert!(persons.contains("p2"));
        assert!(!persons.contains("p3"));
    }

    #[test]
    fn test_with_person_keeps_attributes() {
        let persons = PersonTable::new()
            .with_attribute("p1", "age", 34.0)
            .with_person("p1");
        assert_eq!(persons.get("p1").unwrap().len(), 1);
    }
}
