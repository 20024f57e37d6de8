//! # Fitness
//!
//! Scoring for candidate teams. A team is one combination pick per slot; its
//! fitness is the summed points of the flattened riders, unless the team is
//! invalid. Two things invalidate a team: the same rider appearing in more
//! than one slot, and a total cost above the budget ceiling. Invalid teams
//! score the reserved [`INVALID_FITNESS`] sentinel, strictly below every
//! achievable valid score, so they can exist transiently in the population
//! but never win a tournament or the best-so-far slot.
//!
//! Scoring is pure. The [`Evaluator`] memoizes it keyed by genome value,
//! since rider costs and points are static for the run; the cache is shared
//! behind a mutex so the parallel evaluation path can read and insert
//! concurrently. Memoization is an optimization only and never changes an
//! outcome.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::rider::Rider;
use crate::slots::Slot;

/// One combination index per slot.
pub(crate) type Genome = Vec<usize>;

/// Sentinel fitness for invalid teams. Valid scores are point sums, hence
/// non-negative; anything below zero loses to every valid team.
pub(crate) const INVALID_FITNESS: i64 = -1;

/// Iterates the pool indices of a genome's riders, in slot order.
pub(crate) fn flatten<'a>(
    genome: &'a [usize],
    slots: &'a [Slot],
) -> impl Iterator<Item = usize> + 'a {
    genome
        .iter()
        .zip(slots)
        .flat_map(|(&pick, slot)| slot.combos[pick].iter().copied())
}

/// Memoizing fitness evaluator, owned by one solver for one run.
///
/// Entries are never evicted; the table is bounded by the number of distinct
/// genomes a generation-bounded run can visit and dies with the solver.
#[derive(Debug)]
pub(crate) struct Evaluator {
    budget: u32,
    cache: Mutex<HashMap<Genome, i64>>,
}

impl Evaluator {
    pub(crate) fn new(budget: u32) -> Self {
        Self {
            budget,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the fitness of `genome`, computing and caching it on a miss.
    pub(crate) fn score(&self, genome: &[usize], slots: &[Slot], pool: &[Rider]) -> i64 {
        if let Some(&score) = self.cache.lock().unwrap().get(genome) {
            return score;
        }

        // Not held across the computation so concurrent misses can proceed.
        let score = self.evaluate(genome, slots, pool);
        self.cache.lock().unwrap().insert(genome.to_vec(), score);

        score
    }

    /// The pure scoring policy, uncached.
    fn evaluate(&self, genome: &[usize], slots: &[Slot], pool: &[Rider]) -> i64 {
        let mut seen = HashSet::new();
        let mut cost: u64 = 0;
        let mut points: i64 = 0;

        for idx in flatten(genome, slots) {
            let rider = &pool[idx];
            if !seen.insert(rider.rider_id) {
                return INVALID_FITNESS;
            }
            cost += u64::from(rider.cost);
            points += i64::from(rider.points);
        }

        if cost > u64::from(self.budget) {
            return INVALID_FITNESS;
        }

        points
    }

    /// Number of memoized genomes.
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}
