pub mod engine;
pub mod fitness;
pub mod options;

pub use engine::{Checkpoint, Checkpoints, Solver};
pub use options::{SolverOptions, SolverOptionsBuilder};
