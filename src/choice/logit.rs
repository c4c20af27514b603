//! Multinomial logit choice over available alternatives.
//!
//! # Algorithm
//!
//! 1. For each chooser, compute utility `V_j` of every available row.
//! 2. `MaxUtility`: pick the highest `V_j` (first row on ties).
//! 3. `Sample`: draw from `P_j = exp(V_j) / Σ exp(V_k)` with one uniform
//!    per chooser from an RNG stream derived from `(seed, tour_id)`.
//!
//! Because each tour owns its RNG stream, a tour's choice does not depend on
//! which other tours share its batch, chunk or category pass. Stream seeds
//! are FNV-1a hashes, so they do not change across toolchains; the draws
//! themselves are stable for a given `rand` version.
//!
//! # Reference
//! McFadden (1974), "Conditional Logit Analysis of Qualitative Choice Behavior"

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{ChoiceEvaluator, Chooser, EvaluationContext, TourChoice, UtilitySpec};
use crate::error::{Result, ScheduleError};
use crate::scheduler::InteractionDataset;
use crate::timetable::Timetable;

/// How a chooser's alternative is selected from utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMode {
    /// Deterministic argmax.
    MaxUtility,
    /// Monte Carlo draw from logit probabilities.
    Sample {
        /// Base seed for per-tour RNG streams.
        seed: u64,
    },
}

/// Linear-utility multinomial logit evaluator.
#[derive(Debug, Clone)]
pub struct LogitEvaluator {
    mode: ChoiceMode,
}

impl LogitEvaluator {
    /// Creates an evaluator with the given mode.
    pub fn new(mode: ChoiceMode) -> Self {
        Self { mode }
    }

    /// Deterministic max-utility evaluator.
    pub fn max_utility() -> Self {
        Self::new(ChoiceMode::MaxUtility)
    }

    /// Sampling evaluator with a base seed.
    pub fn sampling(seed: u64) -> Self {
        Self::new(ChoiceMode::Sample { seed })
    }

    /// Selection mode.
    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }

    fn select(&self, tour_id: &str, utilities: &[f64]) -> usize {
        match self.mode {
            ChoiceMode::MaxUtility => {
                let mut best = 0;
                for (i, &u) in utilities.iter().enumerate() {
                    if u > utilities[best] {
                        best = i;
                    }
                }
                best
            }
            ChoiceMode::Sample { seed } => {
                let probs = logit_probabilities(utilities);
                let mut rng = StdRng::seed_from_u64(stream_seed(seed, tour_id));
                let draw: f64 = rng.random();
                let mut cumulative = 0.0;
                for (i, p) in probs.iter().enumerate() {
                    cumulative += p;
                    if draw < cumulative {
                        return i;
                    }
                }
                // Rounding left the cumulative sum just under 1.0
                probs.len() - 1
            }
        }
    }
}

impl Default for LogitEvaluator {
    fn default() -> Self {
        Self::max_utility()
    }
}

impl ChoiceEvaluator for LogitEvaluator {
    type Spec = UtilitySpec;

    fn name(&self) -> &'static str {
        "MNL"
    }

    fn evaluate<T: Timetable>(
        &mut self,
        choosers: &[Chooser],
        interactions: &InteractionDataset<'_>,
        spec: &UtilitySpec,
        context: &EvaluationContext<'_, T>,
    ) -> Result<Vec<TourChoice>> {
        debug!(
            label = context.trace_label,
            choosers = choosers.len(),
            rows = interactions.len(),
            terms = spec.terms.len(),
            "evaluating logit choices"
        );

        let mut choices = Vec::with_capacity(choosers.len());
        for (pos, chooser) in choosers.iter().enumerate() {
            let rows = interactions.rows_for(pos);
            if rows.is_empty() {
                return Err(ScheduleError::Infeasible {
                    tour_id: chooser.tour_id.clone(),
                    person_id: chooser.person_id.clone(),
                    label: context.trace_label.to_string(),
                });
            }

            let utilities = rows
                .iter()
                .map(|row| spec.utility(chooser, row.alternative, context))
                .collect::<Result<Vec<f64>>>()?;

            let picked = self.select(&chooser.tour_id, &utilities);
            choices.push(TourChoice::new(
                chooser.tour_id.clone(),
                rows[picked].alternative.id,
            ));
        }
        Ok(choices)
    }
}

/// Logit probabilities `exp(V_j) / Σ exp(V_k)`, shifted by the maximum
/// utility for numerical stability.
pub fn logit_probabilities(utilities: &[f64]) -> Vec<f64> {
    let max = utilities
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = utilities.iter().map(|&u| (u - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the little-endian seed bytes followed by the tour id bytes.
fn stream_seed(seed: u64, tour_id: &str) -> u64 {
    seed.to_le_bytes()
        .iter()
        .chain(tour_id.as_bytes())
        .fold(FNV_OFFSET_BASIS, |hash, &byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Feature;
    use crate::models::{AlternativeSet, Constants};
    use crate::scheduler::build_interactions;
    use crate::timetable::PersonTimetable;

    fn chooser(tour_id: &str, person_id: &str) -> Chooser {
        Chooser {
            tour_id: tour_id.into(),
            person_id: person_id.into(),
            tour_num: 1,
            category: None,
            attributes: Default::default(),
            previous: None,
        }
    }

    #[test]
    fn test_logit_probabilities() {
        let p = logit_probabilities(&[0.0, 0.0]);
        assert!((p[0] - 0.5).abs() < 1e-12);

        let p = logit_probabilities(&[1000.0, 0.0]);
        assert!((p[0] - 1.0).abs() < 1e-12);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_utility_picks_best_available() {
        let alts = AlternativeSet::from_windows(&[(0, 4), (4, 8), (8, 12), (12, 16)]);
        let mut tt = PersonTimetable::new(["p1", "p2"], &alts).unwrap();
        tt.assign(&["p2"], &[3]).unwrap();
        let constants = Constants::new();
        let choosers = vec![chooser("t1", "p1"), chooser("t2", "p2")];
        let dataset = build_interactions(&choosers, &alts, &tt, "tdd", "test").unwrap();

        // Later starts are better
        let spec = UtilitySpec::new().with_term("start", Feature::alternative("start"), 1.0);
        let ctx = EvaluationContext {
            constants: &constants,
            choice_column: "tdd",
            trace_label: "test",
            timetable: &tt,
        };
        let choices = LogitEvaluator::max_utility()
            .evaluate(&choosers, &dataset, &spec, &ctx)
            .unwrap();

        assert_eq!(choices, vec![TourChoice::new("t1", 3), TourChoice::new("t2", 2)]);
    }

    #[test]
    fn test_max_utility_tie_takes_first_row() {
        let mut eval = LogitEvaluator::max_utility();
        assert_eq!(eval.select("t", &[1.0, 1.0, 0.5]), 0);
        eval = LogitEvaluator::default();
        assert_eq!(eval.mode(), ChoiceMode::MaxUtility);
    }

    #[test]
    fn test_sampling_is_reproducible_per_tour() {
        let eval = LogitEvaluator::sampling(7);
        let utilities = [0.0, 0.3, -0.2, 0.1];
        let first = eval.select("tour-17", &utilities);
        for _ in 0..5 {
            assert_eq!(eval.select("tour-17", &utilities), first);
        }
        assert!(first < utilities.len());
    }

    #[test]
    fn test_stream_seed_is_fixed() {
        assert_eq!(stream_seed(7, "tour-17"), 2_453_918_002_816_456_371);
        assert_eq!(stream_seed(7, "tour-18"), 2_453_932_296_467_623_114);
        assert_ne!(stream_seed(8, "tour-17"), stream_seed(7, "tour-17"));
    }

    #[test]
    fn test_sampling_follows_dominant_alternative() {
        let eval = LogitEvaluator::sampling(99);
        for i in 0..50 {
            let tour = format!("t{i}");
            assert_eq!(eval.select(&tour, &[-50.0, 50.0, -50.0]), 1);
        }
    }

    #[test]
    fn test_sampling_spreads_over_equal_alternatives() {
        let eval = LogitEvaluator::sampling(3);
        let mut seen = [0usize; 2];
        for i in 0..200 {
            seen[eval.select(&format!("t{i}"), &[0.0, 0.0])] += 1;
        }
        assert!(seen[0] > 50 && seen[1] > 50, "{seen:?}");
    }
}
