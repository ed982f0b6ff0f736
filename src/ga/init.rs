//! Initial population construction.
//!
//! Two strategies are available:
//!
//! - [`InitStrategy::RandomShuffle`]: every member is an independent random
//!   arrangement of the catalog, cut to the schedule length.
//! - [`InitStrategy::ExhaustiveSeed`]: enumerate every permutation of the
//!   catalog, keep the best as a seed, and fill the population with shuffled
//!   copies of it. Costs `P!` evaluations, so it is gated by a catalog limit.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::fitness::FitnessEvaluator;
use crate::error::ScheduleError;
use crate::rating::ProgramId;

/// How the initial population is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitStrategy {
    /// Independent random shuffles of the catalog.
    #[default]
    RandomShuffle,
    /// Best full permutation by exhaustive enumeration, then shuffled copies.
    ExhaustiveSeed,
}

/// Builds initial populations of schedules.
#[derive(Debug, Clone, Copy)]
pub struct PopulationInitializer<'a> {
    evaluator: FitnessEvaluator<'a>,
    catalog_len: usize,
    slot_count: usize,
}

impl<'a> PopulationInitializer<'a> {
    /// Creates an initializer for schedules of `slot_count` slots drawn from
    /// the evaluator's catalog.
    pub fn new(evaluator: FitnessEvaluator<'a>, slot_count: usize) -> Self {
        Self {
            evaluator,
            catalog_len: evaluator.table().len(),
            slot_count,
        }
    }

    /// Produces exactly `size` schedules of length `slot_count`.
    ///
    /// # Errors
    /// [`ScheduleError::InfeasibleSearch`] when `strategy` is
    /// [`InitStrategy::ExhaustiveSeed`] and the catalog exceeds
    /// `exhaustive_limit`.
    pub fn initialize<R: Rng>(
        &self,
        strategy: InitStrategy,
        size: usize,
        exhaustive_limit: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<ProgramId>>, ScheduleError> {
        match strategy {
            InitStrategy::RandomShuffle => Ok(self.random_shuffle(size, rng)),
            InitStrategy::ExhaustiveSeed => {
                let seed = self.exhaustive_seed(exhaustive_limit)?;
                Ok(self.fill_from_seed(&seed, size, rng))
            }
        }
    }

    /// `size` independent shuffles of `0..P`, each cut to `slot_count`.
    pub fn random_shuffle<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Vec<ProgramId>> {
        let catalog: Vec<ProgramId> = (0..self.catalog_len).collect();
        (0..size)
            .map(|_| {
                let mut perm = catalog.clone();
                perm.shuffle(rng);
                perm.truncate(self.slot_count);
                perm
            })
            .collect()
    }

    /// Best full permutation of the catalog, scored on its first
    /// `slot_count` slots. The first permutation in lexicographic order wins
    /// ties.
    pub fn exhaustive_seed(&self, limit: usize) -> Result<Vec<ProgramId>, ScheduleError> {
        if self.catalog_len > limit {
            return Err(ScheduleError::InfeasibleSearch {
                catalog: self.catalog_len,
                limit,
            });
        }

        let mut best: Option<(f64, Vec<ProgramId>)> = None;
        let mut visited = 0usize;
        for perm in Permutations::new(self.catalog_len) {
            visited += 1;
            let score = self.evaluator.evaluate(&perm[..self.slot_count]);
            if best.as_ref().map_or(true, |(b, _)| score > *b) {
                best = Some((score, perm));
            }
        }

        let (score, perm) = best.ok_or_else(|| ScheduleError::data("catalog is empty"))?;
        debug!(permutations = visited, score, "exhaustive seed selected");
        Ok(perm)
    }

    /// The seed itself, followed by `size - 1` shuffled copies, all cut to
    /// `slot_count`.
    fn fill_from_seed<R: Rng>(
        &self,
        seed: &[ProgramId],
        size: usize,
        rng: &mut R,
    ) -> Vec<Vec<ProgramId>> {
        (0..size)
            .map(|i| {
                let mut perm = seed.to_vec();
                if i > 0 {
                    perm.shuffle(rng);
                }
                perm.truncate(self.slot_count);
                perm
            })
            .collect()
    }
}

/// Lazy lexicographic enumeration of all permutations of `0..n`.
///
/// Iterative (no recursion), finite, and not restartable: yields exactly
/// `n!` permutations starting from the identity, then `None` forever.
///
/// ```
/// use u_airtime::ga::Permutations;
///
/// let all: Vec<Vec<usize>> = Permutations::new(3).collect();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[0], vec![0, 1, 2]);
/// assert_eq!(all[5], vec![2, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Permutations {
    current: Vec<usize>,
    done: bool,
}

impl Permutations {
    /// Enumerates permutations of `0..n`. For `n == 0` nothing is yielded.
    pub fn new(n: usize) -> Self {
        Self {
            current: (0..n).collect(),
            done: n == 0,
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.current.clone();

        // Advance to the lexicographic successor (Knuth, TAOCP 7.2.1.2 L).
        let p = &mut self.current;
        let pivot = (0..p.len().saturating_sub(1))
            .rev()
            .find(|&i| p[i] < p[i + 1]);
        match pivot {
            Some(i) => {
                let j = (i + 1..p.len())
                    .rev()
                    .find(|&j| p[j] > p[i])
                    .unwrap_or(i + 1);
                p.swap(i, j);
                p[i + 1..].reverse();
            }
            None => self.done = true,
        }

        Some(out)
    }
}
