//! Crossover and mutation for slot schedules.
//!
//! Both operators return freshly owned children and never write to a
//! parent's storage.
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: splice two parents at one cut point, falling
//!   back to a parent copy when the splice repeats a program.
//!
//! # Mutation
//!
//! - [`mutate`]: replace one slot's program with a different catalog program.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*, ch. 1

use rand::Rng;

use super::types::all_distinct;
use crate::rating::ProgramId;

// ============================================================================
// Crossover
// ============================================================================

/// Single-point crossover with parent fallback.
///
/// # Algorithm
///
/// 1. Draw a cut point `k` uniformly from `[1, S-2]` (for `S = 2`, `k = 1`)
/// 2. `child1 = parent1[..k] ++ parent2[k..]`,
///    `child2 = parent2[..k] ++ parent1[k..]`
/// 3. A child that repeats a program is replaced by a copy of its
///    corresponding parent. No retry.
///
/// Schedules of length 0 or 1 have no cut point; both children are copies.
///
/// # Complexity
/// O(S) time, O(S) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<R: Rng>(
    parent1: &[ProgramId],
    parent2: &[ProgramId],
    rng: &mut R,
) -> (Vec<ProgramId>, Vec<ProgramId>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let point = random_cut_point(n, rng);
    (
        splice_or_parent(parent1, parent2, point),
        splice_or_parent(parent2, parent1, point),
    )
}

/// `head[..point] ++ tail[point..]`, or a copy of `head` if that repeats a program.
fn splice_or_parent(head: &[ProgramId], tail: &[ProgramId], point: usize) -> Vec<ProgramId> {
    let mut child = Vec::with_capacity(head.len());
    child.extend_from_slice(&head[..point]);
    child.extend_from_slice(&tail[point..]);
    if all_distinct(&child) {
        child
    } else {
        head.to_vec()
    }
}

/// Cut point in `[1, n-2]`, or 1 when `n == 2`.
fn random_cut_point<R: Rng>(n: usize, rng: &mut R) -> usize {
    if n <= 3 {
        1
    } else {
        rng.random_range(1..=n - 2)
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Single-slot mutation that never keeps the current program.
///
/// A slot is chosen uniformly; its program is replaced by one drawn
/// uniformly from the other `catalog_len - 1` programs. The result differs
/// from `schedule` in exactly one position.
///
/// No duplicate repair is applied: the replacement may already air in
/// another slot. With an empty schedule or a single-program catalog there is
/// nothing to change and a copy is returned.
///
/// # Complexity
/// O(S) for the copy, O(1) for the change
pub fn mutate<R: Rng>(schedule: &[ProgramId], catalog_len: usize, rng: &mut R) -> Vec<ProgramId> {
    let mut child = schedule.to_vec();
    if child.is_empty() || catalog_len < 2 {
        return child;
    }

    let slot = rng.random_range(0..child.len());
    let current = child[slot];
    let mut replacement = rng.random_range(0..catalog_len - 1);
    if replacement >= current {
        replacement += 1;
    }
    child[slot] = replacement;
    child
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ---- Crossover ----

    #[test]
    fn test_cut_point_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 10];
        for _ in 0..2000 {
            let k = random_cut_point(10, &mut rng);
            assert!((1..=8).contains(&k), "cut point {k} out of range");
            seen[k] = true;
        }
        assert!(seen[1] && seen[8], "extremes never drawn: {seen:?}");
    }

    #[test]
    fn test_disjoint_parents_splice() {
        // Parents share no programs, so every splice is valid.
        let mut rng = StdRng::seed_from_u64(42);
        let p1 = vec![0, 1, 2, 3, 4];
        let p2 = vec![5, 6, 7, 8, 9];
        for _ in 0..100 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            let k = c1.iter().take_while(|&&g| g < 5).count();
            assert!((1..=3).contains(&k));
            assert_eq!(&c1[..k], &p1[..k]);
            assert_eq!(&c1[k..], &p2[k..]);
            assert_eq!(&c2[..k], &p2[..k]);
            assert_eq!(&c2[k..], &p1[k..]);
        }
    }

    #[test]
    fn test_invalid_splice_falls_back_to_parent() {
        // Reversed parents: for any cut point in [1, 2] both splices repeat.
        let mut rng = StdRng::seed_from_u64(42);
        let p1 = vec![0, 1, 2, 3];
        let p2 = vec![3, 2, 1, 0];
        for _ in 0..50 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1, p1);
            assert_eq!(c2, p2);
        }
    }

    #[test]
    fn test_parent_with_repeat() {
        // p1 already repeats program 0 (as after a mutation). Cut 1 gives
        // [0,1,2,0] and cut 2 gives [0,0,2,0], so child1 is always p1.
        // Child2 is [3,0,1,2] at cut 1 and repeats at cut 2.
        let mut rng = StdRng::seed_from_u64(9);
        let p1 = vec![0, 0, 1, 2];
        let p2 = vec![3, 1, 2, 0];
        let spliced = vec![3, 0, 1, 2];
        let (mut saw_splice, mut saw_parent) = (false, false);
        for _ in 0..100 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1, p1);
            if c2 == spliced {
                saw_splice = true;
            } else {
                assert_eq!(c2, p2);
                saw_parent = true;
            }
        }
        assert!(saw_splice && saw_parent);
    }

    #[test]
    fn test_both_parents_with_repeats() {
        let mut rng = StdRng::seed_from_u64(5);
        let p1 = vec![0, 0, 1, 1];
        let p2 = vec![1, 1, 0, 0];
        for _ in 0..50 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1, p1);
            assert_eq!(c2, p2);
        }
    }

    #[test]
    fn test_children_always_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        let p1 = vec![4, 1, 7, 0, 3, 6];
        let p2 = vec![1, 4, 0, 7, 6, 3];
        for _ in 0..200 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert!(all_distinct(&c1), "child1 repeats: {c1:?}");
            assert!(all_distinct(&c2), "child2 repeats: {c2:?}");
        }
    }

    #[test]
    fn test_two_slot_crossover() {
        let mut rng = StdRng::seed_from_u64(42);
        let (c1, c2) = single_point_crossover(&[0, 1], &[2, 3], &mut rng);
        assert_eq!(c1, vec![0, 3]);
        assert_eq!(c2, vec![2, 1]);
    }

    #[test]
    fn test_single_slot_copies() {
        let mut rng = StdRng::seed_from_u64(42);
        let (c1, c2) = single_point_crossover(&[4], &[7], &mut rng);
        assert_eq!(c1, vec![4]);
        assert_eq!(c2, vec![7]);
    }

    #[test]
    #[should_panic(expected = "parents must have equal length")]
    fn test_length_mismatch_panics() {
        let mut rng = StdRng::seed_from_u64(42);
        single_point_crossover(&[0, 1, 2], &[0, 1], &mut rng);
    }

    // ---- Mutation ----

    #[test]
    fn test_mutation_changes_exactly_one_slot() {
        let mut rng = StdRng::seed_from_u64(42);
        let original = vec![0, 1, 2, 3, 4];
        for _ in 0..500 {
            let child = mutate(&original, 8, &mut rng);
            let diffs = original
                .iter()
                .zip(&child)
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(diffs, 1, "{original:?} -> {child:?}");
            assert!(child.iter().all(|&p| p < 8));
        }
    }

    #[test]
    fn test_mutation_reaches_whole_catalog() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let child = mutate(&[0], 4, &mut rng);
            seen[child[0]] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_mutation_may_introduce_duplicate() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = vec![0, 1];
        let duplicated = (0..200).any(|_| !all_distinct(&mutate(&original, 3, &mut rng)));
        assert!(duplicated);
    }

    #[test]
    fn test_mutation_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(mutate(&[0, 0], 1, &mut rng), vec![0, 0]);
        assert!(mutate(&[], 5, &mut rng).is_empty());
    }

    #[test]
    fn test_mutation_leaves_parent_untouched() {
        let mut rng = StdRng::seed_from_u64(42);
        let parent = vec![3, 1, 2];
        let _ = mutate(&parent, 5, &mut rng);
        assert_eq!(parent, vec![3, 1, 2]);
    }
}
