pub mod types;
pub mod init;
pub mod selection;
pub mod crossover;
pub mod mutation;
pub mod local_search;
pub mod solver;

pub use solver::solve_instance;
pub use types::{GaParams, RunOutcome, ScoredTour};
