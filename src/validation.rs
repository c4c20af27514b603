//! Input validation for tour populations.
//!
//! Checks structural integrity of tours, persons, and alternatives before
//! scheduling. Detects:
//! - Duplicate tour and alternative IDs
//! - Tours referencing unknown persons
//! - Tour numbers outside the 1-based sequence
//! - Two tours of one person sharing tour number and category
//! - Empty or malformed alternative sets

use crate::models::{AlternativeSet, PersonTable, Tour};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A tour references a person that doesn't exist.
    UnknownPerson,
    /// A tour number is zero.
    InvalidTourNumber,
    /// A person has two tours with the same number and category.
    DuplicateTourNumber,
    /// The alternative set is empty.
    NoAlternatives,
    /// An alternative ends before it starts.
    InvalidAlternative,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the input data for a scheduling run.
///
/// Checks:
/// 1. No duplicate tour IDs
/// 2. Every tour's person exists in the person table
/// 3. Every tour number is at least 1
/// 4. No person has two tours with the same number and category
/// 5. At least one alternative exists
/// 6. No duplicate alternative IDs
/// 7. No alternative ends before it starts
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_population(
    tours: &[Tour],
    persons: &PersonTable,
    alternatives: &AlternativeSet,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut tour_ids = HashSet::new();
    let mut slots = HashSet::new();
    for tour in tours {
        if !tour_ids.insert(tour.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate tour ID: {}", tour.id),
            ));
        }

        if !persons.contains(&tour.person_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPerson,
                format!(
                    "Tour '{}' references unknown person '{}'",
                    tour.id, tour.person_id
                ),
            ));
        }

        if tour.tour_num == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTourNumber,
                format!("Tour '{}' has tour_num 0", tour.id),
            ));
        }

        let slot = (
            tour.person_id.as_str(),
            tour.tour_num,
            tour.category.as_deref(),
        );
        if !slots.insert(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTourNumber,
                format!(
                    "Person '{}' has more than one tour {} of category {:?}",
                    tour.person_id, tour.tour_num, tour.category
                ),
            ));
        }
    }

    if alternatives.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoAlternatives,
            "Alternative set is empty",
        ));
    }

    let mut alt_ids = HashSet::new();
    for alt in alternatives {
        if !alt_ids.insert(alt.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate alternative ID: {}", alt.id),
            ));
        }
        if alt.end < alt.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidAlternative,
                format!(
                    "Alternative {} ends ({}) before it starts ({})",
                    alt.id, alt.end, alt.start
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
