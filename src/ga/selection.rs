//! Parent pools for the GA.
//!
//! Parents are drawn uniformly at random from a prefix of the population
//! sorted best-first. A narrow prefix intensifies exploitation; the full
//! population favours exploration.

use rand::Rng;

/// Where parents are sampled from.
///
/// # Examples
///
/// ```
/// use u_airtime::ga::ParentPool;
///
/// assert_eq!(ParentPool::TopK(10).size(50), 10);
/// assert_eq!(ParentPool::TopK(10).size(4), 4);
/// assert_eq!(ParentPool::Full.size(50), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentPool {
    /// The best `k` schedules of the sorted population.
    TopK(usize),
    /// The whole population.
    Full,
}

impl Default for ParentPool {
    fn default() -> Self {
        ParentPool::TopK(10)
    }
}

impl ParentPool {
    /// Number of schedules eligible as parents in a population of `len`.
    pub fn size(&self, len: usize) -> usize {
        match self {
            ParentPool::TopK(k) => (*k).min(len),
            ParentPool::Full => len,
        }
    }

    /// Select a parent index from a population of `len` sorted best-first.
    ///
    /// # Panics
    /// Panics if the pool is empty.
    pub fn select<R: Rng>(&self, len: usize, rng: &mut R) -> usize {
        let size = self.size(len);
        assert!(size > 0, "cannot select from empty parent pool");
        rng.random_range(0..size)
    }
}
