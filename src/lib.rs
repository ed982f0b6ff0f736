//! Broadcast slot scheduling with a genetic algorithm.
//!
//! Assigns a fixed catalog of programs to a fixed sequence of time slots so
//! as to maximize the total audience rating:
//!
//! - **Ratings** ([`rating`]): the program catalog and each program's rating
//!   per slot, loaded from CSV or built in memory.
//! - **Genetic Algorithm** ([`ga`]): population initialization (random
//!   shuffle or exhaustive seed), single-point crossover with parent
//!   fallback, single-slot mutation, elitism and a fixed-length
//!   generational loop.
//! - **Report** ([`report`]): per-slot time label, program and rating of the
//!   winning schedule.
//!
//! # Example
//!
//! ```
//! use u_airtime::ga::{optimize, AlgorithmConfig};
//! use u_airtime::rating::RatingTable;
//! use u_airtime::report::{ScheduleReport, SlotLayout};
//!
//! let csv = "Program,Hour 6,Hour 7,Hour 8\n\
//!            news,0.1,0.3,0.2\n\
//!            drama,0.4,0.1,0.2\n\
//!            sports,0.2,0.2,0.5\n";
//! let table = RatingTable::from_csv_reader(csv.as_bytes())?;
//! let config = AlgorithmConfig::default().with_seed(1);
//! let result = optimize(&table, table.slot_count(), config)?;
//! let report = ScheduleReport::new(&table, &result.best, &SlotLayout::default());
//! assert_eq!(report.entries[0].time_label, "06:00");
//! # Ok::<(), u_airtime::ScheduleError>(())
//! ```

pub mod error;
pub mod ga;
pub mod rating;
pub mod report;

pub use error::ScheduleError;
