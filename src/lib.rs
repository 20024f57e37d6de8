pub mod error;
pub mod rider;
pub mod rng;
pub mod slots;
pub mod solver;

// Re-export commonly used types for convenience
pub use error::{Result, SolverError};
pub use rider::{Rider, Role};
pub use slots::{RosterRules, SlotFilter, SlotSpec};
pub use solver::{Checkpoint, Checkpoints, Solver, SolverOptions};
