//! Small puzzle solvers.
//!
//! - Countdown: search expressions over a bag of digit and operator tiles
//!   for the value closest to a target.
//! - Lyric: validate a grid of mirror characters by tracing rays through it.

pub mod bag;
pub mod error;
pub mod grid;
pub mod pruning;
pub mod shape;
pub mod solver;
pub mod tracer;

// Re-export main types
pub use bag::{Bag, DigitCounts, Operator, OperatorCounts};
pub use error::{PuzzleError, Result};
pub use grid::{Direction, Grid, Mirror, Position};
pub use shape::{shapes, Shape, Value};
pub use solver::{solve, Permutations, Solution, SolverConfig};
pub use tracer::{validate, TraceConfig, Violation};
