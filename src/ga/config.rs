//! GA configuration.
//!
//! [`AlgorithmConfig`] holds all parameters that control the evolutionary loop.
//! It is an explicit value passed to the engine at construction; the engine
//! reads no ambient settings.

use super::init::InitStrategy;
use super::selection::ParentPool;
use crate::error::ScheduleError;

/// Largest catalog the exhaustive seeding strategy may ever be allowed to
/// enumerate (10! = 3 628 800 permutations).
pub const MAX_EXHAUSTIVE_CATALOG: usize = 10;

/// Configuration for the scheduling GA.
///
/// # Defaults
///
/// ```
/// use u_airtime::ga::AlgorithmConfig;
///
/// let config = AlgorithmConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 100);
/// assert_eq!(config.elitism_count, 2);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_airtime::ga::{AlgorithmConfig, ParentPool};
///
/// let config = AlgorithmConfig::default()
///     .with_crossover_rate(0.9)
///     .with_mutation_rate(0.05)
///     .with_parent_pool(ParentPool::Full)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
///
/// Setters store values as given. Out-of-range values are reported by
/// [`validate`](Self::validate), never clamped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmConfig {
    /// Probability of applying crossover to a parent pair, in `[0, 0.95]`.
    pub crossover_rate: f64,

    /// Probability of mutating each child, in `[0.01, 0.05]`.
    pub mutation_rate: f64,

    /// Number of generations to run. At least 1.
    pub generations: usize,

    /// Number of schedules in the population.
    pub population_size: usize,

    /// Number of top schedules copied unchanged into each new generation.
    ///
    /// Must satisfy `1 <= elitism_count <= population_size`.
    pub elitism_count: usize,

    /// Which part of the sorted population parents are drawn from.
    pub parent_pool: ParentPool,

    /// How the initial population is built.
    pub init_strategy: InitStrategy,

    /// Largest catalog accepted by [`InitStrategy::ExhaustiveSeed`].
    ///
    /// Capped at [`MAX_EXHAUSTIVE_CATALOG`].
    pub exhaustive_limit: usize,

    /// Whether to evaluate offspring in parallel (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            generations: 100,
            population_size: 50,
            elitism_count: 2,
            parent_pool: ParentPool::default(),
            init_strategy: InitStrategy::default(),
            exhaustive_limit: 8,
            parallel: false,
            seed: None,
        }
    }
}

impl AlgorithmConfig {
    /// Lowest accepted crossover rate.
    pub const CROSSOVER_RATE_MIN: f64 = 0.0;
    /// Highest accepted crossover rate.
    pub const CROSSOVER_RATE_MAX: f64 = 0.95;
    /// Lowest accepted mutation rate.
    pub const MUTATION_RATE_MIN: f64 = 0.01;
    /// Highest accepted mutation rate.
    pub const MUTATION_RATE_MAX: f64 = 0.05;

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elitism count.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Sets the parent pool.
    pub fn with_parent_pool(mut self, pool: ParentPool) -> Self {
        self.parent_pool = pool;
        self
    }

    /// Sets the initialization strategy.
    pub fn with_init_strategy(mut self, strategy: InitStrategy) -> Self {
        self.init_strategy = strategy;
        self
    }

    /// Sets the largest catalog accepted by exhaustive seeding.
    pub fn with_exhaustive_limit(mut self, limit: usize) -> Self {
        self.exhaustive_limit = limit;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for a quick look: small population, few generations.
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            generations: 30,
            ..Self::default()
        }
    }

    /// Preset for a thorough search: larger population and budget,
    /// parents drawn from the whole population.
    pub fn thorough() -> Self {
        Self {
            population_size: 200,
            generations: 500,
            elitism_count: 4,
            parent_pool: ParentPool::Full,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(Self::CROSSOVER_RATE_MIN..=Self::CROSSOVER_RATE_MAX).contains(&self.crossover_rate) {
            return Err(ScheduleError::config(format!(
                "crossover_rate {} outside [{}, {}]",
                self.crossover_rate,
                Self::CROSSOVER_RATE_MIN,
                Self::CROSSOVER_RATE_MAX
            )));
        }
        if !(Self::MUTATION_RATE_MIN..=Self::MUTATION_RATE_MAX).contains(&self.mutation_rate) {
            return Err(ScheduleError::config(format!(
                "mutation_rate {} outside [{}, {}]",
                self.mutation_rate,
                Self::MUTATION_RATE_MIN,
                Self::MUTATION_RATE_MAX
            )));
        }
        if self.generations == 0 {
            return Err(ScheduleError::config("generations must be at least 1"));
        }
        if self.elitism_count == 0 {
            return Err(ScheduleError::config("elitism_count must be at least 1"));
        }
        if self.elitism_count > self.population_size {
            return Err(ScheduleError::config(format!(
                "elitism_count {} exceeds population_size {}",
                self.elitism_count, self.population_size
            )));
        }
        if let ParentPool::TopK(0) = self.parent_pool {
            return Err(ScheduleError::config("parent pool must hold at least 1 schedule"));
        }
        if self.exhaustive_limit > MAX_EXHAUSTIVE_CATALOG {
            return Err(ScheduleError::config(format!(
                "exhaustive_limit {} exceeds the maximum of {}",
                self.exhaustive_limit, MAX_EXHAUSTIVE_CATALOG
            )));
        }
        Ok(())
    }
}
