//! Population-level scheduling driver.
//!
//! # Algorithm
//!
//! 1. Validate the population and give every person an empty previous-tour
//!    entry.
//! 2. Group tours by ascending tour number. Group k+1 reads the state
//!    committed by group k, so this order is fixed.
//! 3. Within a group, run one pass, or one pass per category when specs
//!    are keyed by category (categories in sorted order).
//! 4. Expand every choice into the alternative's start/end/duration.
//! 5. Finalize the timetable.
//!
//! All passes are planned before the first one runs, so a tour with a
//! missing or unknown category, or a pass holding two tours of one person,
//! aborts the run before the timetable is touched.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::info;

use super::pass::{run_pass, PassContext};
use super::previous::PreviousTourState;
use crate::choice::{ChoiceEvaluator, SpecSelector};
use crate::config::SchedulingConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{AlternativeSet, Constants, PersonTable, Tour, TourAssignment, TourSchedule};
use crate::timetable::Timetable;
use crate::validation::validate_population;

/// Input container for a scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest<S> {
    /// Tours to schedule.
    pub tours: Vec<Tour>,
    /// Person attributes.
    pub persons: PersonTable,
    /// Alternative set.
    pub alternatives: AlternativeSet,
    /// Utility spec(s).
    pub spec: SpecSelector<S>,
    /// Constants bound for utility evaluation.
    pub constants: Constants,
}

impl<S> ScheduleRequest<S> {
    /// Creates a request with no constants.
    pub fn new(
        tours: Vec<Tour>,
        persons: PersonTable,
        alternatives: AlternativeSet,
        spec: SpecSelector<S>,
    ) -> Self {
        Self {
            tours,
            persons,
            alternatives,
            spec,
            constants: Constants::new(),
        }
    }

    /// Sets the constants.
    pub fn with_constants(mut self, constants: Constants) -> Self {
        self.constants = constants;
        self
    }

    /// Binds one constant.
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }
}

/// One pass of a run: a tour-number group, or one category of it.
#[derive(Debug)]
pub struct PlannedPass<'a, S> {
    /// Trace label of the pass.
    pub label: String,
    /// Tour number shared by all tours of the pass.
    pub tour_num: u32,
    /// Category, for per-category specs.
    pub category: Option<&'a str>,
    /// Tours, in input order.
    pub tours: Vec<&'a Tour>,
    /// Spec used by the pass.
    pub spec: &'a S,
}

/// Splits tours into ordered passes.
///
/// # Errors
/// - [`ScheduleError::MissingCategory`] if specs are per category and a tour
///   has no category.
/// - [`ScheduleError::UnknownCategory`] if a tour's category has no spec.
/// - [`ScheduleError::DuplicatePersonInBatch`] if a pass would hold two
///   tours of one person.
pub fn plan_passes<'a, S>(
    tours: &'a [Tour],
    spec: &'a SpecSelector<S>,
    trace_label: &str,
) -> Result<Vec<PlannedPass<'a, S>>> {
    let mut by_num: BTreeMap<u32, Vec<&Tour>> = BTreeMap::new();
    for tour in tours {
        by_num.entry(tour.tour_num).or_default().push(tour);
    }

    let mut passes = Vec::new();
    for (tour_num, group) in by_num {
        let label = extend_trace_label(trace_label, &format!("tour_{tour_num}"));
        match spec {
            SpecSelector::Uniform(spec) => passes.push(PlannedPass {
                label,
                tour_num,
                category: None,
                tours: group,
                spec,
            }),
            SpecSelector::PerCategory(specs) => {
                let mut by_category: BTreeMap<&str, Vec<&Tour>> = BTreeMap::new();
                for tour in group {
                    let category = tour.category.as_deref().ok_or_else(|| {
                        ScheduleError::MissingCategory {
                            tour_id: tour.id.clone(),
                        }
                    })?;
                    if !specs.contains_key(category) {
                        return Err(ScheduleError::UnknownCategory {
                            tour_id: tour.id.clone(),
                            category: category.to_string(),
                        });
                    }
                    by_category.entry(category).or_default().push(tour);
                }
                for (category, tours) in by_category {
                    passes.push(PlannedPass {
                        label: extend_trace_label(&label, category),
                        tour_num,
                        category: Some(category),
                        tours,
                        spec: &specs[category],
                    });
                }
            }
        }
    }

    for pass in &passes {
        let mut persons = HashSet::with_capacity(pass.tours.len());
        for tour in &pass.tours {
            if !persons.insert(tour.person_id.as_str()) {
                return Err(ScheduleError::DuplicatePersonInBatch {
                    person_id: tour.person_id.clone(),
                    label: pass.label.clone(),
                });
            }
        }
    }
    Ok(passes)
}

/// Schedules a whole tour population.
///
/// Every input tour appears exactly once in the result. The timetable
/// holds every assignment and is finalized before returning. Any fault
/// aborts the run; nothing is finalized in that case.
pub fn schedule_population<E, T>(
    request: &ScheduleRequest<E::Spec>,
    evaluator: &mut E,
    timetable: &mut T,
    config: &SchedulingConfig,
) -> Result<TourSchedule>
where
    E: ChoiceEvaluator,
    T: Timetable,
{
    if request.tours.is_empty() {
        return Err(ScheduleError::EmptyPopulation);
    }
    validate_population(&request.tours, &request.persons, &request.alternatives)
        .map_err(ScheduleError::InvalidInput)?;

    let passes = plan_passes(&request.tours, &request.spec, &config.trace_label)?;
    info!(
        label = config.trace_label.as_str(),
        tours = request.tours.len(),
        passes = passes.len(),
        alternatives = request.alternatives.len(),
        "scheduling tour population"
    );

    let mut previous =
        PreviousTourState::new(request.tours.iter().map(|t| t.person_id.as_str()));
    let ctx = PassContext {
        persons: &request.persons,
        alternatives: &request.alternatives,
        constants: &request.constants,
        choice_column: &config.choice_column,
        chunk_size: config.chunk_size,
    };

    let mut choices = Vec::with_capacity(request.tours.len());
    for pass in &passes {
        choices.extend(run_pass(
            &pass.tours,
            pass.spec,
            &ctx,
            &pass.label,
            evaluator,
            timetable,
            &mut previous,
        )?);
    }

    let tours_by_id: HashMap<&str, &Tour> =
        request.tours.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut schedule = TourSchedule::new();
    for choice in &choices {
        let tour = tours_by_id.get(choice.tour_id.as_str()).ok_or_else(|| {
            ScheduleError::EvaluatorContract(format!("choice for unknown tour '{}'", choice.tour_id))
        })?;
        let alternative = request.alternatives.require(choice.alternative_id)?;
        if !schedule.add_assignment(TourAssignment::from_choice(tour, alternative)) {
            return Err(ScheduleError::EvaluatorContract(format!(
                "tour '{}' scheduled twice",
                choice.tour_id
            )));
        }
    }
    debug_assert_eq!(schedule.len(), request.tours.len());

    timetable.finalize()?;
    info!(
        label = config.trace_label.as_str(),
        scheduled = schedule.len(),
        "tour scheduling complete"
    );
    Ok(schedule)
}

/// Appends a segment to a trace label (`a` + `b` → `a.b`).
pub fn extend_trace_label(label: &str, segment: &str) -> String {
    if label.is_empty() {
        segment.to_string()
    } else {
        format!("{label}.{segment}")
    }
}

/// Tour scheduler bound to a choice evaluator.
///
/// # Example
///
/// ```
/// use tour_schedule::choice::{Feature, LogitEvaluator, SpecSelector, UtilitySpec};
/// use tour_schedule::models::{AlternativeSet, PersonTable, Tour};
/// use tour_schedule::scheduler::{ScheduleRequest, TourScheduler};
/// use tour_schedule::timetable::PersonTimetable;
///
/// let alternatives = AlternativeSet::from_windows(&[(0, 4), (4, 8), (8, 12), (12, 16)]);
/// let persons = PersonTable::new().with_person("p1");
/// let tours = vec![
///     Tour::new("t1", "p1"),
///     Tour::new("t2", "p1").with_tour_num(2),
/// ];
/// let spec = UtilitySpec::new().with_term("duration", Feature::alternative("duration"), 0.1);
/// let request = ScheduleRequest::new(tours, persons, alternatives.clone(), SpecSelector::Uniform(spec));
///
/// let mut timetable = PersonTimetable::new(["p1"], &alternatives).unwrap();
/// let mut scheduler = TourScheduler::new(LogitEvaluator::sampling(42));
/// let schedule = scheduler.schedule(&request, &mut timetable).unwrap();
///
/// assert_eq!(schedule.len(), 2);
/// assert_ne!(schedule.get("t1").unwrap().alternative_id, schedule.get("t2").unwrap().alternative_id);
/// ```
#[derive(Debug, Clone)]
pub struct TourScheduler<E> {
    evaluator: E,
    config: SchedulingConfig,
}

impl<E: ChoiceEvaluator> TourScheduler<E> {
    /// Creates a scheduler with default configuration.
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            config: SchedulingConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SchedulingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the chunk size (0 = no chunking).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Sets the base trace label.
    pub fn with_trace_label(mut self, label: impl Into<String>) -> Self {
        self.config.trace_label = label.into();
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// The bound evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Schedules a request against a timetable.
    pub fn schedule<T: Timetable>(
        &mut self,
        request: &ScheduleRequest<E::Spec>,
        timetable: &mut T,
    ) -> Result<TourSchedule> {
        schedule_population(request, &mut self.evaluator, timetable, &self.config)
    }
}
