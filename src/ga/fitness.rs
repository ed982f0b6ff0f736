//! Schedule scoring.

use super::types::Schedule;
use crate::rating::{ProgramId, RatingTable};

/// Scores schedules against a [`RatingTable`].
///
/// Fitness is the sum over slots of the rating of the program in that slot.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    table: &'a RatingTable,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator over `table`.
    pub fn new(table: &'a RatingTable) -> Self {
        Self { table }
    }

    /// The table this evaluator reads.
    pub fn table(&self) -> &'a RatingTable {
        self.table
    }

    /// Total rating of `programs`, where `programs[i]` airs in slot `i`.
    ///
    /// # Panics
    /// Panics if a program id is not in the table or the schedule is longer
    /// than the table's slot count. Callers only build schedules from table
    /// ids, checked against the slot count when the engine is created.
    pub fn evaluate(&self, programs: &[ProgramId]) -> f64 {
        programs
            .iter()
            .enumerate()
            .map(|(slot, &id)| self.table.rating(id, slot))
            .sum()
    }

    /// Computes and stores the fitness of `schedule`.
    pub fn score(&self, schedule: &mut Schedule) {
        schedule.fitness = self.evaluate(&schedule.programs);
    }
}
