//! Candidate schedule representation.

use std::collections::HashSet;

use crate::rating::ProgramId;

/// A candidate schedule: one program per time slot, with its cached fitness.
///
/// Higher fitness is better. A schedule is *valid* when no program occupies
/// two slots; mutation may produce invalid schedules, and every consumer
/// tolerates them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Program id at each slot index.
    pub programs: Vec<ProgramId>,
    /// Total rating of this schedule.
    pub fitness: f64,
}

impl Schedule {
    /// Wraps a program sequence with unknown fitness.
    pub fn unscored(programs: Vec<ProgramId>) -> Self {
        Self {
            programs,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the schedule has no slots.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Whether every slot holds a distinct program.
    pub fn is_valid(&self) -> bool {
        all_distinct(&self.programs)
    }
}

/// Whether `programs` contains no repeated id.
pub fn all_distinct(programs: &[ProgramId]) -> bool {
    let mut seen = HashSet::with_capacity(programs.len());
    programs.iter().all(|p| seen.insert(*p))
}
