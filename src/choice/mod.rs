//! Discrete-choice evaluation over interaction datasets.
//!
//! A scheduling pass hands its choosers (enriched tours) and the
//! availability-filtered interaction rows to a [`ChoiceEvaluator`], which
//! returns exactly one alternative per chooser. The scheduler does not care
//! how the choice is made; [`LogitEvaluator`] is a linear-utility
//! multinomial logit implementation.
//!
//! # Usage
//!
//! ```
//! use tour_schedule::choice::{Feature, LogitEvaluator, SpecSelector, UtilitySpec};
//!
//! let spec = UtilitySpec::new()
//!     .with_term("duration", Feature::alternative("duration"), 0.2)
//!     .with_term("late start", Feature::alternative("start"), -0.1);
//!
//! let _evaluator = LogitEvaluator::sampling(42);
//! let specs = SpecSelector::Uniform(spec);
//! assert!(!specs.is_per_category());
//! ```
//!
//! # References
//!
//! - Train (2009), "Discrete Choice Methods with Simulation", Ch. 3
//! - Vovsha & Bradley (2004), "Hybrid Discrete Choice Departure-Time and
//!   Duration Model for Scheduling Travel Tours"

mod logit;
mod utility;

pub use logit::{logit_probabilities, ChoiceMode, LogitEvaluator};
pub use utility::{Feature, UtilitySpec, UtilityTerm};

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Attributes, Constants};
use crate::scheduler::{InteractionDataset, PreviousTourFeatures};
use crate::timetable::Timetable;

/// A tour enriched for evaluation: its own attributes, its person's
/// attributes and the previous-tour features of its person.
#[derive(Debug, Clone, PartialEq)]
pub struct Chooser {
    /// Tour being scheduled.
    pub tour_id: String,
    /// Owning person.
    pub person_id: String,
    /// Tour number (1-based).
    pub tour_num: u32,
    /// Tour category.
    pub category: Option<String>,
    /// Merged tour + person attributes, plus `tour_num` and any
    /// `<column>_previous` features.
    pub attributes: Attributes,
    /// Slot of the person's most recently scheduled tour, if any.
    pub previous: Option<PreviousTourFeatures>,
}

impl Chooser {
    /// Reads a chooser attribute.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.attributes.get(column).copied()
    }

    /// Whether the person already has a scheduled tour.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// One chooser's selected alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourChoice {
    /// Chosen-for tour.
    pub tour_id: String,
    /// Chosen alternative index.
    pub alternative_id: u32,
}

impl TourChoice {
    /// Creates a choice.
    pub fn new(tour_id: impl Into<String>, alternative_id: u32) -> Self {
        Self {
            tour_id: tour_id.into(),
            alternative_id,
        }
    }
}

/// Pass-level bindings available to utility evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a, T> {
    /// Named constants.
    pub constants: &'a Constants,
    /// Column under which alternative ids are exposed.
    pub choice_column: &'a str,
    /// Label of the running pass.
    pub trace_label: &'a str,
    /// Current timetable state (read-only).
    pub timetable: &'a T,
}

/// Makes one choice per chooser from its available interaction rows.
///
/// # Contract
/// The returned vector has exactly one entry per chooser, and every chosen
/// alternative is one of that chooser's rows in `interactions`. The
/// scheduler checks this and treats a violation as fatal.
pub trait ChoiceEvaluator {
    /// Utility specification consumed by this evaluator.
    type Spec;

    /// Evaluator name (for logging).
    fn name(&self) -> &'static str;

    /// Chooses one alternative per chooser.
    fn evaluate<T: Timetable>(
        &mut self,
        choosers: &[Chooser],
        interactions: &InteractionDataset<'_>,
        spec: &Self::Spec,
        context: &EvaluationContext<'_, T>,
    ) -> Result<Vec<TourChoice>>;
}

/// A single spec for every tour, or one spec per tour category.
///
/// Resolved once per run; per-category selection splits every tour-number
/// group into one pass per category.
#[derive(Debug, Clone)]
pub enum SpecSelector<S> {
    /// Same spec for all tours.
    Uniform(S),
    /// Spec keyed by tour category.
    PerCategory(BTreeMap<String, S>),
}

impl<S> SpecSelector<S> {
    /// Builds a per-category selector.
    pub fn per_category<K, I>(specs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        SpecSelector::PerCategory(specs.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Whether tours are split by category.
    pub fn is_per_category(&self) -> bool {
        matches!(self, SpecSelector::PerCategory(_))
    }

    /// Spec for a category (`Uniform` ignores the category).
    pub fn spec_for(&self, category: Option<&str>) -> Option<&S> {
        match self {
            SpecSelector::Uniform(spec) => Some(spec),
            SpecSelector::PerCategory(specs) => category.and_then(|c| specs.get(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_selector_uniform() {
        let selector = SpecSelector::Uniform("all");
        assert!(!selector.is_per_category());
        assert_eq!(selector.spec_for(None), Some(&"all"));
        assert_eq!(selector.spec_for(Some("shop")), Some(&"all"));
    }

    #[test]
    fn test_spec_selector_per_category() {
        let selector = SpecSelector::per_category([("work", 1), ("shop", 2)]);
        assert!(selector.is_per_category());
        assert_eq!(selector.spec_for(Some("shop")), Some(&2));
        assert_eq!(selector.spec_for(Some("escort")), None);
        assert_eq!(selector.spec_for(None), None);
    }

    #[test]
    fn test_chooser_values() {
        let chooser = Chooser {
            tour_id: "t1".into(),
            person_id: "p1".into(),
            tour_num: 1,
            category: None,
            attributes: [("age".to_string(), 40.0)].into_iter().collect(),
            previous: None,
        };
        assert_eq!(chooser.value("age"), Some(40.0));
        assert_eq!(chooser.value("income"), None);
        assert!(!chooser.has_previous());
    }
}
