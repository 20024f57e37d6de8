//! # Evolutionary Solver
//!
//! The [`Solver`] runs a generational genetic algorithm over the slot tables
//! built by the partitioner. A genome is one combination pick per slot; each
//! generation evaluates the whole population, updates the best team found so
//! far, selects parents by tournament, recombines them pairwise, and mutates
//! the children.
//!
//! Progress is exposed as a lazy sequence of [`Checkpoint`]s: calling
//! [`Solver::run`] returns an iterator that computes generations on demand
//! and yields whenever the best team improved, at every reporting interval,
//! and once more unconditionally after the final generation. Dropping the
//! iterator cancels the run; the last best team stays retrievable through
//! [`Solver::best`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use rouleur::rider::Rider;
//! use rouleur::slots::RosterRules;
//! use rouleur::solver::{Solver, SolverOptions};
//!
//! fn optimize(pool: Vec<Rider>) -> rouleur::error::Result<()> {
//!     let options = SolverOptions::builder().generations(1000).build();
//!     let mut solver = Solver::new(pool, RosterRules::standard(), options)?;
//!
//!     for checkpoint in solver.run() {
//!         println!(
//!             "generation {}: {} points for {} credits",
//!             checkpoint.generation, checkpoint.points, checkpoint.cost
//!         );
//!     }
//!     Ok(())
//! }
//! ```

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::Result;
use crate::rider::Rider;
use crate::rng::RandomNumberGenerator;
use crate::slots::{build_slots, RosterRules, Slot};
use crate::solver::fitness::{flatten, Evaluator, Genome};
use crate::solver::options::SolverOptions;

/// A snapshot of the best team known at one generation.
///
/// The team is flattened in slot order (schedule order, wildcard last) and
/// carried by value; the caller cannot reach solver state through it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub generation: usize,
    pub team: Vec<Rider>,
    pub points: u32,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Running,
    Stopped,
}

/// Generational genetic-algorithm solver for one roster problem.
///
/// Owns the rider pool, the slot tables, the population, the memoized
/// evaluator and the best-so-far team for the lifetime of a run. All state is
/// validated eagerly in [`Solver::new`]; the generational loop itself cannot
/// fail.
pub struct Solver {
    pool: Vec<Rider>,
    slots: Vec<Slot>,
    options: SolverOptions,
    rng: RandomNumberGenerator,
    evaluator: Evaluator,
    population: Vec<Genome>,
    scores: Vec<i64>,
    best: Option<(Genome, i64)>,
    generation: usize,
    state: State,
}

impl Solver {
    /// Creates a solver for the given pool, roster rules and configuration,
    /// seeded from system entropy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed [`SolverOptions`], and a
    /// configuration or data error from the partitioner if any slot cannot
    /// offer a single combination. Nothing is validated lazily: a solver that
    /// constructs will run to completion.
    pub fn new(pool: Vec<Rider>, rules: RosterRules, options: SolverOptions) -> Result<Self> {
        Self::with_rng(pool, rules, options, RandomNumberGenerator::new())
    }

    /// Creates a solver with a caller-supplied random number generator.
    ///
    /// Useful with [`RandomNumberGenerator::from_seed`] for reproducible
    /// runs in tests and benchmarks.
    pub fn with_rng(
        pool: Vec<Rider>,
        rules: RosterRules,
        options: SolverOptions,
        rng: RandomNumberGenerator,
    ) -> Result<Self> {
        options.validate()?;
        let slots = build_slots(&pool, &rules)?;

        debug!(
            riders = pool.len(),
            slots = slots.len(),
            budget = rules.budget(),
            "solver configured"
        );

        Ok(Self {
            pool,
            slots,
            options,
            rng,
            evaluator: Evaluator::new(rules.budget()),
            population: Vec::new(),
            scores: Vec::new(),
            best: None,
            generation: 0,
            state: State::Ready,
        })
    }

    /// Starts or resumes the run, returning the lazy checkpoint sequence.
    ///
    /// The sequence is finite and non-restartable: it ends after the final
    /// generation's checkpoint, and dropping it early cancels the run for
    /// good. The best team found up to that point remains available through
    /// [`Solver::best`].
    pub fn run(&mut self) -> Checkpoints<'_> {
        Checkpoints { solver: self }
    }

    /// The best team known so far, if at least one generation was evaluated.
    pub fn best(&self) -> Option<Checkpoint> {
        self.best
            .as_ref()
            .map(|(genome, _)| self.checkpoint_at(self.generation, genome))
    }

    fn checkpoint_at(&self, generation: usize, genome: &[usize]) -> Checkpoint {
        let team: Vec<Rider> = flatten(genome, &self.slots)
            .map(|idx| self.pool[idx].clone())
            .collect();
        let points = team.iter().map(|r| r.points).sum();
        let cost = team.iter().map(|r| r.cost).sum();

        Checkpoint {
            generation,
            team,
            points,
            cost,
        }
    }

    fn generate_genome(&mut self) -> Genome {
        let picks: Vec<usize> = self.slots.iter().map(|slot| slot.len()).collect();
        picks.into_iter().map(|len| self.rng.index(len)).collect()
    }

    fn init_population(&mut self) {
        let size = self.options.get_population_size();
        self.population = (0..size).map(|_| self.generate_genome()).collect();
    }

    /// Scores the whole population and folds the result into the best-so-far
    /// team. Returns whether the best team improved this generation.
    ///
    /// Evaluation switches to rayon above the configured population
    /// threshold; the best update always runs as an index-ordered reduction
    /// afterwards, so the outcome does not depend on evaluation order.
    fn evaluate_population(&mut self) -> bool {
        let scores: Vec<i64> = if self.population.len() >= self.options.get_parallel_threshold() {
            let (population, evaluator) = (&self.population, &self.evaluator);
            let (slots, pool) = (&self.slots, &self.pool);
            population
                .par_iter()
                .map(|genome| evaluator.score(genome, slots, pool))
                .collect()
        } else {
            self.population
                .iter()
                .map(|genome| self.evaluator.score(genome, &self.slots, &self.pool))
                .collect()
        };

        if self.best.is_none() {
            self.best = Some((self.population[0].clone(), scores[0]));
        }

        let mut improved = false;
        let mut best_score = self.best.as_ref().map(|(_, score)| *score).unwrap_or(i64::MIN);

        for (idx, &score) in scores.iter().enumerate() {
            if score > best_score {
                self.best = Some((self.population[idx].clone(), score));
                best_score = score;
                improved = true;
                debug!(
                    generation = self.generation,
                    fitness = score,
                    "best team improved"
                );
            }
        }

        self.scores = scores;
        improved
    }

    /// Picks one parent index by tournament: a uniform sample of distinct
    /// members, won by the highest fitness, first encountered on a tie.
    fn tournament(&mut self) -> usize {
        let sample = self
            .rng
            .sample(self.population.len(), self.options.get_tournament_size());

        let mut winner = sample[0];
        for &idx in &sample[1..] {
            if self.scores[idx] > self.scores[winner] {
                winner = idx;
            }
        }
        winner
    }

    /// Single-point crossover over a parent pair.
    ///
    /// The draw is compared with `>=` on purpose: `p_crossover` is the
    /// probability that a pair passes through unchanged, not the probability
    /// of recombining.
    fn recombine(&mut self, lhs: &[usize], rhs: &[usize]) -> (Genome, Genome) {
        let draw = self.rng.uniform();

        if draw >= self.options.get_p_crossover() && lhs.len() > 1 {
            let cut = self.rng.range_inclusive(1, lhs.len() - 1);

            let mut fst = Vec::with_capacity(lhs.len());
            fst.extend_from_slice(&lhs[..cut]);
            fst.extend_from_slice(&rhs[cut..]);

            let mut snd = Vec::with_capacity(rhs.len());
            snd.extend_from_slice(&rhs[..cut]);
            snd.extend_from_slice(&lhs[cut..]);

            (fst, snd)
        } else {
            (lhs.to_vec(), rhs.to_vec())
        }
    }

    /// Independently re-draws each slot pick with the mutation probability.
    ///
    /// A mutated pick may reintroduce riders already used elsewhere in the
    /// team; validity is enforced at scoring time only.
    fn mutate(&mut self, genome: &mut Genome) {
        let p_mutation = self.options.get_p_mutation();
        for (idx, pick) in genome.iter_mut().enumerate() {
            if self.rng.chance(p_mutation) {
                *pick = self.rng.index(self.slots[idx].len());
            }
        }
    }

    /// Replaces the population wholesale with the next generation's children.
    fn breed_next_generation(&mut self) {
        let size = self.options.get_population_size();
        let parents: Vec<usize> = (0..size).map(|_| self.tournament()).collect();

        let mut children = Vec::with_capacity(size);
        for pair in parents.chunks(2) {
            let lhs = self.population[pair[0]].clone();
            let rhs = self.population[pair[1]].clone();

            let (mut fst, mut snd) = self.recombine(&lhs, &rhs);
            self.mutate(&mut fst);
            self.mutate(&mut snd);
            children.push(fst);
            children.push(snd);
        }

        self.population = children;
        self.generation += 1;
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("riders", &self.pool.len())
            .field("slots", &self.slots.len())
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Lazy checkpoint sequence for one run. See [`Solver::run`].
///
/// Each `next` call advances the solver until a generation produces a
/// checkpoint: an improvement, a reporting-interval boundary, or the final
/// generation. Dropping the sequence early is cooperative cancellation and
/// is terminal.
pub struct Checkpoints<'a> {
    solver: &'a mut Solver,
}

impl Iterator for Checkpoints<'_> {
    type Item = Checkpoint;

    fn next(&mut self) -> Option<Checkpoint> {
        let solver = &mut *self.solver;

        match solver.state {
            State::Stopped => return None,
            State::Ready => {
                solver.init_population();
                solver.state = State::Running;
            }
            State::Running => {}
        }

        loop {
            let improved = solver.evaluate_population();
            let generation = solver.generation;

            if generation == solver.options.get_generations() {
                solver.state = State::Stopped;
                debug!(
                    generation,
                    cached_genomes = solver.evaluator.cache_len(),
                    "generation budget exhausted"
                );
                return Some(
                    solver
                        .best
                        .as_ref()
                        .map(|(genome, _)| genome.clone())
                        .map(|genome| solver.checkpoint_at(generation, &genome))
                        .expect("population was evaluated"),
                );
            }

            let interval = solver.options.get_checkpoint_interval();
            let emit = improved || generation % interval == 0;
            let checkpoint = if emit {
                solver
                    .best
                    .as_ref()
                    .map(|(genome, _)| genome.clone())
                    .map(|genome| solver.checkpoint_at(generation, &genome))
            } else {
                None
            };

            solver.breed_next_generation();

            if let Some(checkpoint) = checkpoint {
                trace!(generation, points = checkpoint.points, "checkpoint");
                return Some(checkpoint);
            }
        }
    }
}

impl Drop for Checkpoints<'_> {
    fn drop(&mut self) {
        if self.solver.state != State::Stopped {
            debug!(
                generation = self.solver.generation,
                "consumer stopped pulling checkpoints; run cancelled"
            );
            self.solver.state = State::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rider::Role;
    use crate::slots::SlotSpec;

    fn rider(id: u32, role: Role, cost: u32, points: u32) -> Rider {
        Rider {
            rider_id: id,
            name: format!("Rider {}", id),
            team: "Test Team".to_string(),
            role,
            cost,
            points,
        }
    }

    fn small_pool() -> Vec<Rider> {
        vec![
            rider(1, Role::Climber, 10, 5),
            rider(2, Role::Climber, 10, 10),
            rider(3, Role::Climber, 10, 15),
            rider(4, Role::Sprinter, 10, 20),
            rider(5, Role::Sprinter, 10, 25),
            rider(6, Role::Unclassed, 10, 30),
        ]
    }

    fn small_rules() -> RosterRules {
        RosterRules::new(
            vec![
                SlotSpec::role(Role::Climber, 2),
                SlotSpec::role(Role::Sprinter, 1),
                SlotSpec::wildcard(),
            ],
            100,
        )
    }

    fn small_options(generations: usize) -> SolverOptions {
        SolverOptions::builder()
            .generations(generations)
            .population_size(10)
            .tournament_size(3)
            .checkpoint_interval(10)
            .build()
    }

    #[test]
    fn test_population_size_is_invariant() {
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            small_options(50),
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        {
            let mut checkpoints = solver.run();
            while checkpoints.next().is_some() {
                assert_eq!(checkpoints.solver.population.len(), 10);
            }
        }
        assert_eq!(solver.population.len(), 10);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let mut solver = Solver::with_rng(
                small_pool(),
                small_rules(),
                small_options(50),
                RandomNumberGenerator::from_seed(seed),
            )
            .unwrap();
            solver.run().collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_cancellation_keeps_best_retrievable() {
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            small_options(1000),
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        let first = solver.run().next().unwrap();

        // The iterator is gone; the run is cancelled, not corrupted.
        let best = solver.best().unwrap();
        assert!(best.points >= first.points);
        assert_eq!(best.team.len(), 4);
    }

    #[test]
    fn test_cancelled_run_is_not_restartable() {
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            small_options(1000),
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        let _ = solver.run().next().unwrap();
        assert_eq!(solver.run().count(), 0);
    }

    #[test]
    fn test_exhausted_run_yields_nothing_more() {
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            small_options(20),
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        let count = solver.run().count();
        assert!(count >= 1);
        assert_eq!(solver.run().count(), 0);
    }

    #[test]
    fn test_recombine_passes_through_at_high_threshold() {
        // p_crossover = 1.0: no draw in [0, 1) reaches the threshold, so
        // every pair passes through untouched.
        let options = SolverOptions::builder()
            .population_size(10)
            .p_crossover(1.0)
            .build();
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            options,
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        let lhs = vec![0, 0, 0];
        let rhs = vec![1, 1, 1];
        for _ in 0..20 {
            let (fst, snd) = solver.recombine(&lhs, &rhs);
            assert_eq!(fst, lhs);
            assert_eq!(snd, rhs);
        }
    }

    #[test]
    fn test_recombine_always_crosses_at_zero_threshold() {
        // p_crossover = 0.0: every draw is at or above the threshold, so
        // every pair recombines at some cut in [1, len - 1].
        let options = SolverOptions::builder()
            .population_size(10)
            .p_crossover(0.0)
            .build();
        let mut solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            options,
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        let lhs = vec![0, 0, 0];
        let rhs = vec![1, 1, 1];
        for _ in 0..20 {
            let (fst, snd) = solver.recombine(&lhs, &rhs);
            assert_ne!(fst, lhs);
            assert_ne!(snd, rhs);
            // Both children keep one value per slot from either parent.
            assert_eq!(fst.len(), 3);
            assert_eq!(snd.len(), 3);
            for (a, b) in fst.iter().zip(snd.iter()) {
                assert_eq!(a + b, 1);
            }
        }
    }

    #[test]
    fn test_best_is_none_before_any_evaluation() {
        let solver = Solver::with_rng(
            small_pool(),
            small_rules(),
            small_options(10),
            RandomNumberGenerator::from_seed(7),
        )
        .unwrap();

        assert!(solver.best().is_none());
    }
}
