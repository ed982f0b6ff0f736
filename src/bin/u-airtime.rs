//! u-airtime CLI.
//!
//! Loads a program rating table from CSV, evolves a slot schedule and prints
//! the winning line-up.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_airtime::ga::{optimize, AlgorithmConfig, InitStrategy, ParentPool};
use u_airtime::rating::RatingTable;
use u_airtime::report::{ScheduleReport, SlotLayout};

#[derive(Parser)]
#[command(name = "u-airtime")]
#[command(about = "TV slot scheduling with a genetic algorithm")]
struct Cli {
    /// CSV rating table: header row, then `program,rating,...` rows
    ratings: PathBuf,

    /// Crossover rate, in [0, 0.95]
    #[arg(long, default_value = "0.8")]
    crossover_rate: f64,

    /// Mutation rate, in [0.01, 0.05]
    #[arg(long, default_value = "0.02")]
    mutation_rate: f64,

    /// Number of generations
    #[arg(long, default_value = "100")]
    generations: usize,

    /// Population size
    #[arg(long, default_value = "50")]
    population_size: usize,

    /// Schedules copied unchanged into each generation
    #[arg(long, default_value = "2")]
    elitism: usize,

    /// Draw parents from the best K schedules
    #[arg(long, default_value = "10", conflicts_with = "full_pool")]
    top_k: usize,

    /// Draw parents from the whole population
    #[arg(long)]
    full_pool: bool,

    /// Seed the population from an exhaustive search (small catalogs only)
    #[arg(long)]
    exhaustive: bool,

    /// Largest catalog accepted by --exhaustive
    #[arg(long, default_value = "8")]
    exhaustive_limit: usize,

    /// Number of slots to schedule (defaults to the rating columns, capped at
    /// the number of programs)
    #[arg(long)]
    slots: Option<usize>,

    /// Hour of the first slot
    #[arg(long, default_value = "6", value_parser = clap::value_parser!(u32).range(0..24))]
    start_hour: u32,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate offspring in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn algorithm_config(&self) -> AlgorithmConfig {
        let mut config = AlgorithmConfig::default()
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(self.mutation_rate)
            .with_generations(self.generations)
            .with_population_size(self.population_size)
            .with_elitism_count(self.elitism)
            .with_parent_pool(if self.full_pool {
                ParentPool::Full
            } else {
                ParentPool::TopK(self.top_k)
            })
            .with_init_strategy(if self.exhaustive {
                InitStrategy::ExhaustiveSeed
            } else {
                InitStrategy::RandomShuffle
            })
            .with_exhaustive_limit(self.exhaustive_limit)
            .with_parallel(self.parallel);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// One slot per rating column, capped at the catalog size so every slot can
/// hold a distinct program.
fn default_slots(table: &RatingTable) -> usize {
    let slots = table.slot_count().min(table.len());
    if slots < table.slot_count() {
        info!(
            columns = table.slot_count(),
            programs = table.len(),
            slots,
            "fewer programs than rating columns, scheduling the leading slots only"
        );
    }
    slots
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let table = RatingTable::from_csv_path(&cli.ratings)
        .with_context(|| format!("loading ratings from {}", cli.ratings.display()))?;
    info!(
        programs = table.len(),
        slots = table.slot_count(),
        "ratings loaded"
    );

    let slots = cli.slots.unwrap_or_else(|| default_slots(&table));
    let config = cli.algorithm_config();
    let result = optimize(&table, slots, config).context("running genetic algorithm")?;

    let layout = SlotLayout {
        start_hour: cli.start_hour,
    };
    let report = ScheduleReport::new(&table, &result.best, &layout);

    println!("=== Final Optimal Schedule ===");
    println!("{report}");
    println!("Generations: {} (seed {})", result.generations, result.seed);

    Ok(())
}
