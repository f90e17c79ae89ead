#![deny(missing_docs)]
//! SAT reductions for logic puzzles.
//!
//! Sudoku completion and bounded-horizon Sokoban planning are encoded as CNF,
//! handed to an external SAT solver and decoded back into puzzle answers.

/// The `error` module holds the crate-level error type.
pub mod error;

/// The `sat` module holds the puzzle-independent plumbing: formulas,
/// assignments, variable indexing, DIMACS input and the solver oracle.
pub mod sat;

/// The `sokoban` module plans Sokoban solutions within a fixed number of
/// steps.
pub mod sokoban;

/// The `sudoku` module solves Sudoku puzzles of side 4, 9, 16 or 25.
pub mod sudoku;

pub use error::Error;
pub use sokoban::solve_sokoban;
pub use sudoku::solve_sudoku;
