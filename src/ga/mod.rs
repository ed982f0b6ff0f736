//! Genetic Algorithm for broadcast slot scheduling.
//!
//! A candidate [`Schedule`] assigns one program per time slot; its fitness is
//! the total audience rating. [`EvolutionEngine`] evolves a population of
//! schedules for a fixed number of generations and returns the best one.
//!
//! # Key Types
//!
//! - [`AlgorithmConfig`]: Algorithm parameters (rates, sizes, pool, seed)
//! - [`FitnessEvaluator`]: Sums ratings over a schedule's slots
//! - [`PopulationInitializer`]: Random-shuffle or exhaustive-seed start
//! - [`EvolutionEngine`]: Executes the evolutionary loop
//! - [`EvolutionResult`]: Final optimization result with statistics
//!
//! # Submodules
//!
//! - [`operators`]: Single-point crossover with parent fallback and
//!   single-slot mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod fitness;
mod init;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::{AlgorithmConfig, MAX_EXHAUSTIVE_CATALOG};
pub use fitness::FitnessEvaluator;
pub use init::{InitStrategy, Permutations, PopulationInitializer};
pub use runner::{optimize, EngineState, EvolutionEngine, EvolutionResult};
pub use selection::ParentPool;
pub use types::{all_distinct, Schedule};
