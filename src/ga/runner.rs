//! GA evolutionary loop execution.
//!
//! [`EvolutionEngine`] orchestrates the complete evolutionary process:
//! initialization → sort → elitism → parent sampling → crossover → mutation
//! → replacement → repeat, for a fixed number of generations.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::AlgorithmConfig;
use super::fitness::FitnessEvaluator;
use super::init::PopulationInitializer;
use super::operators::{mutate, single_point_crossover};
use super::types::Schedule;
use crate::error::ScheduleError;
use crate::rating::RatingTable;

/// Lifecycle of an [`EvolutionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Initial population built and scored; no generation run yet.
    Initialized,
    /// At least one generation has run.
    Evolving,
    /// [`EvolutionEngine::run`] has returned. Further steps are ignored.
    Done,
}

/// Result of a GA optimization run.
///
/// Contains the best schedule of the final population, along with
/// statistics about the evolutionary process.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionResult {
    /// The highest-fitness schedule in the final population.
    pub best: Schedule,

    /// Best fitness value (same as `best.fitness`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Seed the random source was created from.
    pub seed: u64,

    /// Best fitness of the initial population, then after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop over a [`RatingTable`].
///
/// # Usage
///
/// ```
/// use u_airtime::ga::{AlgorithmConfig, EvolutionEngine};
/// use u_airtime::rating::{Program, RatingTable};
///
/// let table = RatingTable::new(vec![
///     Program::new("A", vec![10.0, 1.0]),
///     Program::new("B", vec![1.0, 10.0]),
/// ])?;
/// let config = AlgorithmConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_seed(42);
/// let mut engine = EvolutionEngine::new(&table, 2, config)?;
/// let result = engine.run();
/// assert_eq!(result.best_fitness, 20.0);
/// # Ok::<(), u_airtime::ScheduleError>(())
/// ```
#[derive(Debug)]
pub struct EvolutionEngine<'a> {
    evaluator: FitnessEvaluator<'a>,
    config: AlgorithmConfig,
    slot_count: usize,
    seed: u64,
    rng: StdRng,
    population: Vec<Schedule>,
    generation: usize,
    state: EngineState,
    fitness_history: Vec<f64>,
}

impl<'a> EvolutionEngine<'a> {
    /// Validates the run parameters and builds the scored initial population.
    ///
    /// # Errors
    /// - [`ScheduleError::Configuration`] for invalid `config`, a zero
    ///   `slot_count`, or more slots than programs.
    /// - [`ScheduleError::Data`] when the table has fewer ratings per program
    ///   than `slot_count`.
    /// - [`ScheduleError::InfeasibleSearch`] when exhaustive seeding is
    ///   requested for a catalog above `config.exhaustive_limit`.
    pub fn new(
        table: &'a RatingTable,
        slot_count: usize,
        config: AlgorithmConfig,
    ) -> Result<Self, ScheduleError> {
        config.validate()?;
        if table.is_empty() {
            return Err(ScheduleError::config("program catalog is empty"));
        }
        if slot_count == 0 {
            return Err(ScheduleError::config("slot_count must be at least 1"));
        }
        if slot_count > table.slot_count() {
            return Err(ScheduleError::data(format!(
                "ratings cover {} slots, schedule needs {}",
                table.slot_count(),
                slot_count
            )));
        }
        if slot_count > table.len() {
            return Err(ScheduleError::config(format!(
                "slot_count {} exceeds catalog of {} programs",
                slot_count,
                table.len()
            )));
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let evaluator = FitnessEvaluator::new(table);

        // 1. Initialize population
        let initializer = PopulationInitializer::new(evaluator, slot_count);
        let mut population: Vec<Schedule> = initializer
            .initialize(
                config.init_strategy,
                config.population_size,
                config.exhaustive_limit,
                &mut rng,
            )?
            .into_iter()
            .map(Schedule::unscored)
            .collect();

        // 2. Evaluate initial population
        evaluate_population(&evaluator, &mut population, config.parallel);

        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(best_fitness(&population));

        Ok(Self {
            evaluator,
            config,
            slot_count,
            seed,
            rng,
            population,
            generation: 0,
            state: EngineState::Initialized,
            fitness_history,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current population. Unsorted between generations.
    pub fn population(&self) -> &[Schedule] {
        &self.population
    }

    /// Number of generations executed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Schedule length.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Seed the random source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs one generation and replaces the population.
    ///
    /// Ignored once the engine is [`EngineState::Done`] or the configured
    /// number of generations has already run.
    pub fn step(&mut self) {
        if self.state == EngineState::Done {
            warn!(generation = self.generation, "step ignored: engine is done");
            return;
        }
        if self.generation >= self.config.generations {
            warn!(
                generation = self.generation,
                budget = self.config.generations,
                "step ignored: generation budget exhausted"
            );
            return;
        }
        self.state = EngineState::Evolving;

        let size = self.config.population_size;
        let elite_count = self.config.elitism_count;
        let catalog_len = self.evaluator.table().len();

        // Sort population by fitness (descending, stable)
        sort_best_first(&mut self.population);

        // Elite preservation
        let mut next_gen: Vec<Schedule> = self.population[..elite_count].to_vec();

        // Generate offspring
        let population = &self.population;
        let rng = &mut self.rng;
        while next_gen.len() < size {
            // Selection
            let p1 = &population[self.config.parent_pool.select(size, rng)].programs;
            let p2 = &population[self.config.parent_pool.select(size, rng)].programs;

            // Crossover
            let (mut c1, mut c2) = if rng.random_range(0.0..1.0) < self.config.crossover_rate {
                single_point_crossover(p1, p2, rng)
            } else {
                (p1.clone(), p2.clone())
            };

            // Mutation
            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                c1 = mutate(&c1, catalog_len, rng);
            }
            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                c2 = mutate(&c2, catalog_len, rng);
            }

            next_gen.push(Schedule::unscored(c1));
            next_gen.push(Schedule::unscored(c2));
        }
        next_gen.truncate(size);

        // Evaluate new individuals (skip elites, they're already evaluated)
        evaluate_population(
            &self.evaluator,
            &mut next_gen[elite_count..],
            self.config.parallel,
        );

        self.population = next_gen;
        self.generation += 1;

        let best = best_fitness(&self.population);
        self.fitness_history.push(best);
        debug!(generation = self.generation, best_fitness = best, "generation complete");
    }

    /// Runs the remaining generations and returns the best schedule.
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is checked before each generation. If it is set, the run
    /// stops and returns the best schedule of the current population.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> EvolutionResult {
        if self.state != EngineState::Done {
            info!(
                population_size = self.config.population_size,
                generations = self.config.generations,
                slots = self.slot_count,
                programs = self.evaluator.table().len(),
                seed = self.seed,
                "evolution started"
            );
        }

        let mut cancelled = false;
        while self.state != EngineState::Done && self.generation < self.config.generations {
            // Check cancellation
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            self.step();
        }
        self.state = EngineState::Done;

        let best = find_best(&self.population).clone();
        info!(
            generations = self.generation,
            best_fitness = best.fitness,
            cancelled,
            "evolution finished"
        );

        EvolutionResult {
            best_fitness: best.fitness,
            best,
            generations: self.generation,
            cancelled,
            seed: self.seed,
            fitness_history: self.fitness_history.clone(),
        }
    }
}

/// Builds an engine and runs it to completion.
pub fn optimize(
    table: &RatingTable,
    slot_count: usize,
    config: AlgorithmConfig,
) -> Result<EvolutionResult, ScheduleError> {
    Ok(EvolutionEngine::new(table, slot_count, config)?.run())
}

/// Stable sort, highest fitness first.
fn sort_best_first(population: &mut [Schedule]) {
    population.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(CmpOrdering::Equal)
    });
}

/// Evaluate all schedules in the slice.
#[cfg(feature = "parallel")]
fn evaluate_population(
    evaluator: &FitnessEvaluator<'_>,
    population: &mut [Schedule],
    parallel: bool,
) {
    if parallel {
        population.par_iter_mut().for_each(|s| evaluator.score(s));
    } else {
        population.iter_mut().for_each(|s| evaluator.score(s));
    }
}

/// Evaluate all schedules in the slice.
#[cfg(not(feature = "parallel"))]
fn evaluate_population(
    evaluator: &FitnessEvaluator<'_>,
    population: &mut [Schedule],
    _parallel: bool,
) {
    population.iter_mut().for_each(|s| evaluator.score(s));
}

/// The highest-fitness schedule; the earliest one on ties.
fn find_best(population: &[Schedule]) -> &Schedule {
    let mut best = &population[0];
    for s in &population[1..] {
        if s.fitness > best.fitness {
            best = s;
        }
    }
    best
}

fn best_fitness(population: &[Schedule]) -> f64 {
    find_best(population).fitness
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{InitStrategy, ParentPool};
    use crate::rating::Program;

    fn two_program_table() -> RatingTable {
        RatingTable::new(vec![
            Program::new("A", vec![10.0, 1.0]),
            Program::new("B", vec![1.0, 10.0]),
        ])
        .unwrap()
    }

    /// 12 programs × 8 slots with uneven ratings.
    fn synthetic_table() -> RatingTable {
        let programs = (0..12)
            .map(|p| {
                let ratings = (0..8).map(|s| ((p * 7 + s * 13) % 17) as f64 / 10.0).collect();
                Program::new(format!("p{p}"), ratings)
            })
            .collect();
        RatingTable::new(programs).unwrap()
    }

    fn config() -> AlgorithmConfig {
        AlgorithmConfig::default()
            .with_population_size(30)
            .with_generations(40)
            .with_mutation_rate(0.05)
            .with_seed(42)
    }

    // ---- End-to-end ----

    #[test]
    fn test_two_program_scenario() {
        let table = two_program_table();
        let config = AlgorithmConfig::default()
            .with_population_size(10)
            .with_generations(5)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.02)
            .with_elitism_count(2)
            .with_seed(42);

        let result = optimize(&table, 2, config).unwrap();

        assert_eq!(result.best.programs, vec![0, 1]);
        assert!((result.best_fitness - 20.0).abs() < 1e-12);
        assert_eq!(result.generations, 5);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_exhaustive_seed_run() {
        let table = synthetic_table();
        let small = RatingTable::new(table.programs()[..6].to_vec()).unwrap();
        let config = config().with_init_strategy(InitStrategy::ExhaustiveSeed);

        let mut engine = EvolutionEngine::new(&small, 5, config).unwrap();
        let seeded_best = best_fitness(engine.population());
        let result = engine.run();

        // Elitism keeps the exhaustive optimum in the population.
        assert!(result.best_fitness >= seeded_best);
        assert_eq!(result.best.len(), 5);
    }

    #[test]
    fn test_result_is_population_maximum() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config()).unwrap();
        let result = engine.run();

        let max = engine
            .population()
            .iter()
            .map(|s| s.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_fitness, max);
        assert!(engine.population().contains(&result.best));
        let eval = FitnessEvaluator::new(&table);
        assert!((eval.evaluate(&result.best.programs) - result.best_fitness).abs() < 1e-12);
    }

    // ---- Invariants ----

    #[test]
    fn test_elitism_monotonic_and_size_constant() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config()).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);

        let mut prev = best_fitness(engine.population());
        for _ in 0..40 {
            engine.step();
            assert_eq!(engine.population().len(), 30);
            let best = best_fitness(engine.population());
            assert!(best >= prev, "best fitness dropped: {prev} -> {best}");
            prev = best;
        }
        assert_eq!(engine.state(), EngineState::Evolving);
    }

    #[test]
    fn test_fitness_history() {
        let table = synthetic_table();
        let result = optimize(&table, 8, config()).unwrap();

        // Initial population + one entry per generation
        assert_eq!(result.fitness_history.len(), 41);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0]);
        }
        assert_eq!(result.fitness_history.last().copied(), Some(result.best_fitness));
    }

    #[test]
    fn test_odd_population_truncated() {
        let table = synthetic_table();
        let config = config().with_population_size(11).with_elitism_count(2);
        let mut engine = EvolutionEngine::new(&table, 8, config).unwrap();
        engine.step();
        assert_eq!(engine.population().len(), 11);
    }

    #[test]
    fn test_pure_elitism() {
        let table = synthetic_table();
        let config = config().with_population_size(5).with_elitism_count(5);
        let mut engine = EvolutionEngine::new(&table, 8, config).unwrap();

        let mut expected = engine.population().to_vec();
        sort_best_first(&mut expected);

        engine.step();
        assert_eq!(engine.population(), expected.as_slice());
        engine.step();
        assert_eq!(engine.population(), expected.as_slice());
    }

    #[test]
    fn test_determinism() {
        let table = synthetic_table();
        let a = optimize(&table, 8, config()).unwrap();
        let b = optimize(&table, 8, config()).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let table = synthetic_table();
        let seq = optimize(&table, 8, config().with_parallel(false)).unwrap();
        let par = optimize(&table, 8, config().with_parallel(true)).unwrap();
        assert_eq!(seq.best, par.best);
    }

    #[test]
    fn test_full_parent_pool() {
        let table = synthetic_table();
        let config = config().with_parent_pool(ParentPool::Full);
        let result = optimize(&table, 8, config).unwrap();
        assert_eq!(result.generations, 40);
        assert_eq!(result.best.len(), 8);
        assert!(result.fitness_history.windows(2).all(|w| w[1] >= w[0]));
    }

    // ---- Lifecycle ----

    #[test]
    fn test_cancellation_before_start() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config()).unwrap();
        let initial_best = best_fitness(engine.population());

        let cancel = Arc::new(AtomicBool::new(true));
        let result = engine.run_with_cancel(Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_fitness, initial_best);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn test_step_after_done_ignored() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config().with_generations(3)).unwrap();
        let first = engine.run();
        let snapshot = engine.population().to_vec();

        engine.step();
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.population(), snapshot.as_slice());

        let second = engine.run();
        assert_eq!(first.best, second.best);
    }

    #[test]
    fn test_step_past_budget_ignored() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config().with_generations(3)).unwrap();
        for _ in 0..3 {
            engine.step();
        }
        assert_eq!(engine.state(), EngineState::Evolving);
        let snapshot = engine.population().to_vec();

        engine.step();
        engine.step();
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.population(), snapshot.as_slice());

        let result = engine.run();
        assert_eq!(result.generations, 3);
        assert_eq!(result.fitness_history.len(), 4);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn test_rerun_after_done_is_stable() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config().with_generations(4)).unwrap();
        let first = engine.run();
        let second = engine.run();
        assert_eq!(engine.state(), EngineState::Done);
        assert_eq!(second.generations, 4);
        assert!(!second.cancelled);
        assert_eq!(first.best, second.best);
        assert_eq!(first.fitness_history, second.fitness_history);
    }

    #[test]
    fn test_step_then_run_totals_generations() {
        let table = synthetic_table();
        let mut engine = EvolutionEngine::new(&table, 8, config().with_generations(10)).unwrap();
        engine.step();
        engine.step();
        let result = engine.run();
        assert_eq!(result.generations, 10);
        assert_eq!(result.fitness_history.len(), 11);
    }

    // ---- Fail-fast errors ----

    #[test]
    fn test_invalid_config_rejected() {
        let table = synthetic_table();
        let config = config().with_population_size(3).with_elitism_count(4);
        assert!(matches!(
            EvolutionEngine::new(&table, 8, config),
            Err(ScheduleError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_slots_rejected() {
        let table = synthetic_table();
        assert!(matches!(
            EvolutionEngine::new(&table, 0, config()),
            Err(ScheduleError::Configuration(_))
        ));
    }

    #[test]
    fn test_short_ratings_rejected() {
        let table = synthetic_table();
        assert!(matches!(
            EvolutionEngine::new(&table, 9, config()),
            Err(ScheduleError::Data(_))
        ));
    }

    #[test]
    fn test_more_slots_than_programs_rejected() {
        let table = RatingTable::new(vec![
            Program::new("A", vec![1.0, 2.0, 3.0]),
            Program::new("B", vec![3.0, 2.0, 1.0]),
        ])
        .unwrap();
        assert!(matches!(
            EvolutionEngine::new(&table, 3, config()),
            Err(ScheduleError::Configuration(_))
        ));
    }

    #[test]
    fn test_exhaustive_infeasible_rejected() {
        let table = synthetic_table();
        let config = config()
            .with_init_strategy(InitStrategy::ExhaustiveSeed)
            .with_exhaustive_limit(8);
        assert!(matches!(
            EvolutionEngine::new(&table, 8, config),
            Err(ScheduleError::InfeasibleSearch {
                catalog: 12,
                limit: 8
            })
        ));
    }

    #[test]
    fn test_find_best_prefers_first_on_tie() {
        let mut a = Schedule::unscored(vec![0, 1]);
        a.fitness = 5.0;
        let mut b = Schedule::unscored(vec![1, 0]);
        b.fitness = 5.0;
        let pop = vec![a.clone(), b];
        assert_eq!(find_best(&pop), &a);
    }
}
