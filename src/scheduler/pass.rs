//! One scheduling pass over a homogeneous batch of tours.
//!
//! # Algorithm
//!
//! 1. Reject batches holding two tours of one person.
//! 2. Join person attributes and previous-tour features into choosers.
//! 3. Per chunk of choosers: build interactions, evaluate, check the
//!    evaluator's answer.
//! 4. Commit every choice to the timetable in one call, then to the
//!    previous-tour state.
//!
//! Chunks only bound the size of the cross product held in memory. They run
//! one after another against the same timetable state; nothing is committed
//! until all chunks are done.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::interaction::{build_interactions, InteractionDataset};
use super::previous::{previous_tour_features, PreviousTourState};
use crate::choice::{ChoiceEvaluator, Chooser, EvaluationContext, TourChoice};
use crate::error::{Result, ScheduleError};
use crate::models::{AlternativeSet, Constants, PersonTable, Tour};
use crate::timetable::Timetable;

/// Inputs shared by every pass of a run.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    /// Person attributes.
    pub persons: &'a PersonTable,
    /// Alternative set.
    pub alternatives: &'a AlternativeSet,
    /// Constants bound for utility evaluation.
    pub constants: &'a Constants,
    /// Column under which alternative ids are exposed.
    pub choice_column: &'a str,
    /// Maximum choosers per interaction sub-batch (0 = unlimited).
    pub chunk_size: usize,
}

/// Runs one scheduling pass and returns the choices in batch order.
///
/// # Errors
/// - [`ScheduleError::DuplicatePersonInBatch`] if a person has two tours.
/// - [`ScheduleError::UnknownPerson`] if a tour's person is missing.
/// - [`ScheduleError::Infeasible`] if a tour has no available alternative.
/// - [`ScheduleError::EvaluatorContract`] if the evaluator's answer does not
///   cover each tour exactly once with one of its available alternatives.
pub fn run_pass<B, E, T>(
    batch: &[B],
    spec: &E::Spec,
    ctx: &PassContext<'_>,
    trace_label: &str,
    evaluator: &mut E,
    timetable: &mut T,
    previous: &mut PreviousTourState,
) -> Result<Vec<TourChoice>>
where
    B: Borrow<Tour>,
    E: ChoiceEvaluator,
    T: Timetable,
{
    info!(
        label = trace_label,
        tours = batch.len(),
        evaluator = evaluator.name(),
        "running tour choices"
    );

    let mut persons_seen = HashSet::with_capacity(batch.len());
    for tour in batch {
        let tour = tour.borrow();
        if !persons_seen.insert(tour.person_id.as_str()) {
            return Err(ScheduleError::DuplicatePersonInBatch {
                person_id: tour.person_id.clone(),
                label: trace_label.to_string(),
            });
        }
    }

    let choosers = build_choosers(batch, ctx, previous)?;

    let chunk_size = if ctx.chunk_size == 0 {
        choosers.len().max(1)
    } else {
        ctx.chunk_size
    };

    let mut choices = Vec::with_capacity(choosers.len());
    for (i, chunk) in choosers.chunks(chunk_size).enumerate() {
        let interactions = build_interactions(
            chunk,
            ctx.alternatives,
            &*timetable,
            ctx.choice_column,
            trace_label,
        )?;
        let eval_ctx = EvaluationContext {
            constants: ctx.constants,
            choice_column: ctx.choice_column,
            trace_label,
            timetable: &*timetable,
        };
        let answer = evaluator.evaluate(chunk, &interactions, spec, &eval_ctx)?;
        choices.extend(check_choices(chunk, &interactions, answer, trace_label)?);
        debug!(label = trace_label, chunk = i, choosers = chunk.len(), "chunk evaluated");
    }

    let person_ids: Vec<&str> = choosers.iter().map(|c| c.person_id.as_str()).collect();
    let alternative_ids: Vec<u32> = choices.iter().map(|c| c.alternative_id).collect();
    timetable.assign(&person_ids, &alternative_ids)?;
    for (person_id, choice) in person_ids.iter().zip(&choices) {
        previous.record(person_id, choice)?;
    }
    debug!(label = trace_label, committed = choices.len(), "committed choices");

    Ok(choices)
}

/// Joins person attributes and previous-tour features onto tours.
///
/// Tour attributes win over person attributes of the same name.
fn build_choosers<B: Borrow<Tour>>(
    batch: &[B],
    ctx: &PassContext<'_>,
    previous: &PreviousTourState,
) -> Result<Vec<Chooser>> {
    let features = previous_tour_features(batch, previous, ctx.alternatives)?;

    batch
        .iter()
        .zip(features)
        .map(|(tour, prev)| {
            let tour = tour.borrow();
            let person = ctx
                .persons
                .get(&tour.person_id)
                .ok_or_else(|| ScheduleError::UnknownPerson {
                    tour_id: tour.id.clone(),
                    person_id: tour.person_id.clone(),
                })?;

            let mut attributes = tour.attributes.clone();
            for (key, value) in person {
                attributes.entry(key.clone()).or_insert(*value);
            }
            attributes.insert("tour_num".to_string(), tour.tour_num as f64);
            if let Some(prev) = &prev {
                attributes.extend(prev.columns());
            }

            Ok(Chooser {
                tour_id: tour.id.clone(),
                person_id: tour.person_id.clone(),
                tour_num: tour.tour_num,
                category: tour.category.clone(),
                attributes,
                previous: prev,
            })
        })
        .collect()
}

/// Checks the evaluator's answer and orders it like `choosers`.
fn check_choices(
    choosers: &[Chooser],
    interactions: &InteractionDataset<'_>,
    answer: Vec<TourChoice>,
    trace_label: &str,
) -> Result<Vec<TourChoice>> {
    let violation = |msg: String| ScheduleError::EvaluatorContract(format!("[{trace_label}] {msg}"));

    if answer.len() != choosers.len() {
        return Err(violation(format!(
            "{} choices for {} choosers",
            answer.len(),
            choosers.len()
        )));
    }

    let position: HashMap<&str, usize> = choosers
        .iter()
        .enumerate()
        .map(|(i, c)| (c.tour_id.as_str(), i))
        .collect();

    let mut ordered: Vec<Option<TourChoice>> = vec![None; choosers.len()];
    for choice in answer {
        let &pos = position
            .get(choice.tour_id.as_str())
            .ok_or_else(|| violation(format!("choice for unknown tour '{}'", choice.tour_id)))?;
        if !interactions.contains(pos, choice.alternative_id) {
            return Err(violation(format!(
                "tour '{}' got unavailable alternative {}",
                choice.tour_id, choice.alternative_id
            )));
        }
        if ordered[pos].is_some() {
            return Err(violation(format!("tour '{}' chosen twice", choice.tour_id)));
        }
        ordered[pos] = Some(choice);
    }

    // Equal lengths and no duplicates mean every slot is filled.
    Ok(ordered.into_iter().flatten().collect())
}
