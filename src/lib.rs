//! Optimal solver for square sliding-tile puzzles.
//!
//! [`search::Solver`] runs A* with the Manhattan-distance estimate from
//! [`heuristic`] over [`puzzle::Puzzle`] configurations and returns either a
//! shortest path, a proof that the goal is unreachable, or a notice that the
//! expansion cap was hit. [`wire`] and [`render`] translate results for
//! JSON clients and terminals.

pub mod errors;
pub mod heuristic;
pub mod log;
pub mod puzzle;
pub mod render;
pub mod search;
pub mod wire;

pub use errors::PuzzleError;
pub use puzzle::{Move, Position, Puzzle};
pub use search::{solve, SearchLimits, SearchOutcome, SearchStats, Solution, Solver};
