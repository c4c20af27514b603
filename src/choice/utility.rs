//! Linear-in-parameters utility specification.
//!
//! The utility of an alternative for a chooser is the sum of
//! `coefficient * feature` over the spec's terms. Features read chooser
//! attributes, alternative columns, bound constants, previous-tour slots or
//! the live timetable.

use serde::{Deserialize, Serialize};

use super::{Chooser, EvaluationContext};
use crate::error::{Result, ScheduleError};
use crate::models::{Alternative, END_COLUMN, START_COLUMN};
use crate::timetable::Timetable;

/// A variable contributing to utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Constant 1.0 (alternative-specific constant when combined with
    /// `Equals`).
    Intercept,
    /// Alternative column (`start`, `end`, `duration`, the choice column or
    /// an extra attribute).
    Alternative(String),
    /// Chooser attribute (tour, person, `tour_num`, `*_previous`).
    ///
    /// Reading `start_previous` this way fails on first tours; prefer
    /// [`Feature::Previous`].
    Chooser(String),
    /// Named constant from the pass bindings.
    Constant(String),
    /// `start` or `end` of the person's previous tour; 0.0 when the person
    /// has no previous tour. Any other column is an unknown variable, on
    /// first tours too.
    Previous(String),
    /// 1.0 when the person has a previous tour.
    HasPrevious,
    /// Product of two features.
    Product(Box<Feature>, Box<Feature>),
    /// 1.0 when the feature equals the value.
    Equals(Box<Feature>, f64),
    /// Free periods immediately before the alternative's start.
    AdjacentWindowBefore,
    /// Free periods immediately after the alternative's end.
    AdjacentWindowAfter,
    /// 1.0 when an already scheduled tour ends where the alternative starts.
    PreviousTourEnds,
    /// 1.0 when an already scheduled tour begins where the alternative ends.
    PreviousTourBegins,
}

impl Feature {
    /// Alternative column feature.
    pub fn alternative(column: impl Into<String>) -> Self {
        Feature::Alternative(column.into())
    }

    /// Chooser attribute feature.
    pub fn chooser(column: impl Into<String>) -> Self {
        Feature::Chooser(column.into())
    }

    /// Named constant feature.
    pub fn constant(name: impl Into<String>) -> Self {
        Feature::Constant(name.into())
    }

    /// Previous-tour column feature.
    pub fn previous(column: impl Into<String>) -> Self {
        Feature::Previous(column.into())
    }

    /// Product of two features.
    pub fn product(a: Feature, b: Feature) -> Self {
        Feature::Product(Box::new(a), Box::new(b))
    }

    /// Indicator of `feature == value`.
    pub fn equals(feature: Feature, value: f64) -> Self {
        Feature::Equals(Box::new(feature), value)
    }

    /// Evaluates the feature for one (chooser, alternative) pair.
    pub fn value<T: Timetable>(
        &self,
        chooser: &Chooser,
        alternative: &Alternative,
        context: &EvaluationContext<'_, T>,
    ) -> Result<f64> {
        let unknown = |name: &str| ScheduleError::UnknownVariable {
            name: name.to_string(),
            tour_id: chooser.tour_id.clone(),
        };

        let value = match self {
            Feature::Intercept => 1.0,
            Feature::Alternative(column) if column == context.choice_column => {
                alternative.id as f64
            }
            Feature::Alternative(column) => {
                alternative.value(column).ok_or_else(|| unknown(column))?
            }
            Feature::Chooser(column) => chooser.value(column).ok_or_else(|| unknown(column))?,
            Feature::Constant(name) => context
                .constants
                .get(name)
                .copied()
                .ok_or_else(|| unknown(name))?,
            Feature::Previous(column) => {
                let is_start = match column.as_str() {
                    START_COLUMN => true,
                    END_COLUMN => false,
                    _ => return Err(unknown(column)),
                };
                match &chooser.previous {
                    None => 0.0,
                    Some(prev) if is_start => prev.start as f64,
                    Some(prev) => prev.end as f64,
                }
            }
            Feature::HasPrevious => indicator(chooser.has_previous()),
            Feature::Product(a, b) => {
                a.value(chooser, alternative, context)? * b.value(chooser, alternative, context)?
            }
            Feature::Equals(feature, target) => {
                let v = feature.value(chooser, alternative, context)?;
                indicator((v - target).abs() < 1e-9)
            }
            Feature::AdjacentWindowBefore => context
                .timetable
                .adjacent_window_before(&chooser.person_id, alternative.start)?
                as f64,
            Feature::AdjacentWindowAfter => context
                .timetable
                .adjacent_window_after(&chooser.person_id, alternative.end)?
                as f64,
            Feature::PreviousTourEnds => indicator(
                context
                    .timetable
                    .previous_tour_ends(&chooser.person_id, alternative.start)?,
            ),
            Feature::PreviousTourBegins => indicator(
                context
                    .timetable
                    .previous_tour_begins(&chooser.person_id, alternative.end)?,
            ),
        };
        Ok(value)
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// One weighted feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityTerm {
    /// Human-readable label.
    pub label: String,
    /// Variable.
    pub feature: Feature,
    /// Coefficient.
    pub coefficient: f64,
}

/// A linear utility specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilitySpec {
    /// Terms summed into the utility.
    pub terms: Vec<UtilityTerm>,
}

impl UtilitySpec {
    /// Creates an empty spec (all alternatives equally attractive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term.
    pub fn with_term(mut self, label: impl Into<String>, feature: Feature, coefficient: f64) -> Self {
        self.terms.push(UtilityTerm {
            label: label.into(),
            feature,
            coefficient,
        });
        self
    }

    /// Utility of an alternative for a chooser.
    pub fn utility<T: Timetable>(
        &self,
        chooser: &Chooser,
        alternative: &Alternative,
        context: &EvaluationContext<'_, T>,
    ) -> Result<f64> {
        let mut total = 0.0;
        for term in &self.terms {
            if term.coefficient == 0.0 {
                continue;
            }
            total += term.coefficient * term.feature.value(chooser, alternative, context)?;
        }
        Ok(total)
    }
}
