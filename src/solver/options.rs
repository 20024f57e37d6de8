//! # SolverOptions
//!
//! The `SolverOptions` struct represents the configuration of the genetic
//! search: generation budget, population size, operator probabilities,
//! tournament size, checkpoint reporting interval, and the population size
//! at which fitness evaluation switches to parallel execution.
//!
//! ## Example
//!
//! ```rust
//! use rouleur::solver::SolverOptions;
//!
//! // Defaults tuned for a full solve.
//! let defaults = SolverOptions::default();
//! assert_eq!(defaults.get_generations(), 10_000);
//!
//! // A quick, small search.
//! let quick = SolverOptions::builder()
//!     .generations(500)
//!     .population_size(20)
//!     .build();
//! assert_eq!(quick.get_population_size(), 20);
//! ```

use crate::error::{Result, SolverError};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct SolverOptions {
    generations: usize,
    population_size: usize,
    p_crossover: f64,
    p_mutation: f64,
    tournament_size: usize,
    checkpoint_interval: usize,
    /// Minimum population size to evaluate fitness in parallel.
    parallel_threshold: usize,
}

impl SolverOptions {
    pub fn get_generations(&self) -> usize {
        self.generations
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_p_crossover(&self) -> f64 {
        self.p_crossover
    }

    pub fn get_p_mutation(&self) -> f64 {
        self.p_mutation
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
    }

    /// Returns the minimum population size to evaluate fitness in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Returns a builder for creating a `SolverOptions` instance.
    pub fn builder() -> SolverOptionsBuilder {
        SolverOptionsBuilder::default()
    }

    /// Checks every parameter against its allowed range.
    ///
    /// The solver calls this before generating the initial population; a
    /// malformed configuration is a fatal error, never a runtime fault.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.population_size == 0 || self.population_size % 2 != 0 {
            return Err(SolverError::Configuration(format!(
                "population size must be positive and even, got {}",
                self.population_size
            )));
        }

        if !(0.0..=1.0).contains(&self.p_crossover) {
            return Err(SolverError::Configuration(format!(
                "crossover probability must be within [0, 1], got {}",
                self.p_crossover
            )));
        }

        if !(0.0..=1.0).contains(&self.p_mutation) {
            return Err(SolverError::Configuration(format!(
                "mutation probability must be within [0, 1], got {}",
                self.p_mutation
            )));
        }

        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(SolverError::Configuration(format!(
                "tournament size must be within [1, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }

        if self.checkpoint_interval == 0 {
            return Err(SolverError::Configuration(
                "checkpoint interval must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            generations: 10_000,
            population_size: 100,
            p_crossover: 0.8,
            p_mutation: 0.2,
            tournament_size: 3,
            checkpoint_interval: 100,
            parallel_threshold: 1000,
        }
    }
}

/// Builder for `SolverOptions`.
///
/// Provides a fluent interface; unset parameters fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct SolverOptionsBuilder {
    generations: Option<usize>,
    population_size: Option<usize>,
    p_crossover: Option<f64>,
    p_mutation: Option<f64>,
    tournament_size: Option<usize>,
    checkpoint_interval: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl SolverOptionsBuilder {
    /// Sets the generation budget.
    pub fn generations(mut self, value: usize) -> Self {
        self.generations = Some(value);
        self
    }

    /// Sets the population size. Must be even.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the crossover probability.
    pub fn p_crossover(mut self, value: f64) -> Self {
        self.p_crossover = Some(value);
        self
    }

    /// Sets the mutation probability.
    pub fn p_mutation(mut self, value: f64) -> Self {
        self.p_mutation = Some(value);
        self
    }

    /// Sets the tournament size.
    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    /// Sets the checkpoint reporting interval.
    pub fn checkpoint_interval(mut self, value: usize) -> Self {
        self.checkpoint_interval = Some(value);
        self
    }

    /// Sets the parallel evaluation threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds the `SolverOptions` instance.
    pub fn build(self) -> SolverOptions {
        let defaults = SolverOptions::default();
        SolverOptions {
            generations: self.generations.unwrap_or(defaults.generations),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            p_crossover: self.p_crossover.unwrap_or(defaults.p_crossover),
            p_mutation: self.p_mutation.unwrap_or(defaults.p_mutation),
            tournament_size: self.tournament_size.unwrap_or(defaults.tournament_size),
            checkpoint_interval: self
                .checkpoint_interval
                .unwrap_or(defaults.checkpoint_interval),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SolverOptions::default();
        assert_eq!(options.get_generations(), 10_000);
        assert_eq!(options.get_population_size(), 100);
        assert_eq!(options.get_p_crossover(), 0.8);
        assert_eq!(options.get_p_mutation(), 0.2);
        assert_eq!(options.get_tournament_size(), 3);
        assert_eq!(options.get_checkpoint_interval(), 100);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let options = SolverOptions::builder()
            .generations(200)
            .population_size(50)
            .p_crossover(0.6)
            .p_mutation(0.1)
            .tournament_size(5)
            .checkpoint_interval(25)
            .parallel_threshold(500)
            .build();

        assert_eq!(options.get_generations(), 200);
        assert_eq!(options.get_population_size(), 50);
        assert_eq!(options.get_p_crossover(), 0.6);
        assert_eq!(options.get_p_mutation(), 0.1);
        assert_eq!(options.get_tournament_size(), 5);
        assert_eq!(options.get_checkpoint_interval(), 25);
        assert_eq!(options.get_parallel_threshold(), 500);
    }

    #[test]
    fn test_odd_population_rejected() {
        let options = SolverOptions::builder().population_size(99).build();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_population_rejected() {
        let options = SolverOptions::builder().population_size(0).build();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_out_of_range_probabilities_rejected() {
        let options = SolverOptions::builder().p_crossover(1.5).build();
        assert!(options.validate().is_err());

        let options = SolverOptions::builder().p_mutation(-0.1).build();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_oversized_tournament_rejected() {
        let options = SolverOptions::builder()
            .population_size(10)
            .tournament_size(11)
            .build();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_checkpoint_interval_rejected() {
        let options = SolverOptions::builder().checkpoint_interval(0).build();
        assert!(options.validate().is_err());
    }
}
