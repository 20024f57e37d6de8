//! # Error Types
//!
//! This module defines the error type for the roster solver. All failures are
//! rejected eagerly, before the first generation runs: either the requested
//! roster cannot be formed from the supplied rider pool (data errors), or the
//! genetic-algorithm parameters are malformed (configuration errors).
//!
//! Failing to find a good team is *not* an error: the solver is a heuristic
//! and non-convergence is a quality characteristic, not a fault.
//!
//! ## Examples
//!
//! ```rust
//! use rouleur::error::{Result, SolverError};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size % 2 != 0 {
//!         return Err(SolverError::Configuration(format!(
//!             "population size must be even, got {}",
//!             size
//!         )));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while setting up a roster solve.
///
/// Every variant is fatal and raised before the generational loop starts;
/// nothing is retried.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Malformed genetic-algorithm configuration: odd population size, a
    /// probability outside `[0, 1]`, a tournament larger than the population,
    /// or a zero checkpoint interval.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A roster requirement asks for more riders than the pool can supply,
    /// so no valid team can ever be formed.
    #[error("slot \"{filter}\" needs {required} riders but only {available} are available")]
    EmptySlot {
        filter: String,
        required: usize,
        available: usize,
    },

    /// The rider pool was empty.
    #[error("empty rider pool: nothing to optimize")]
    EmptyPool,

    /// A roster requirement references a role with no riders in the pool.
    #[error("no {0} riders in the pool")]
    RoleAbsent(crate::rider::Role),

    /// A role label from the data source was not recognized.
    #[error("unknown role label {0:?}")]
    UnknownRole(String),
}

/// A specialized Result type for roster solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
