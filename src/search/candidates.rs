//! Ordered upstream candidates with an attempt budget

use crate::upstream::UpstreamInstance;
use rand::seq::SliceRandom;
use rand::Rng;

/// Instances to try for one request, in the order they will be tried.
///
/// The order is a uniform random permutation of the configured pool so load
/// spreads across instances from request to request. Only the first
/// `budget` candidates are ever attempted.
#[derive(Debug, Clone)]
pub struct CandidateList {
    candidates: Vec<UpstreamInstance>,
}

impl CandidateList {
    /// Shuffle the pool with the thread-local RNG
    pub fn shuffled(pool: &[UpstreamInstance], budget: usize) -> Self {
        Self::shuffled_with(pool, budget, &mut rand::thread_rng())
    }

    /// Shuffle the pool with a caller-provided RNG
    pub fn shuffled_with<R: Rng + ?Sized>(
        pool: &[UpstreamInstance],
        budget: usize,
        rng: &mut R,
    ) -> Self {
        let mut candidates = pool.to_vec();
        candidates.shuffle(rng);
        candidates.truncate(budget);
        Self { candidates }
    }

    /// Keep the pool order, only applying the budget
    pub fn in_order(pool: &[UpstreamInstance], budget: usize) -> Self {
        let candidates = pool.iter().take(budget).cloned().collect();
        Self { candidates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpstreamInstance> {
        self.candidates.iter()
    }

    /// Number of attempts this list allows
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a UpstreamInstance;
    type IntoIter = std::slice::Iter<'a, UpstreamInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
