#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module provides functionality for solving Sudoku puzzles by
//! reduction to SAT.

/// The `solver` module contains the encoding, decoding and parsing logic.
pub mod solver;

pub use solver::{Board, Size, Sudoku, SudokuError, SudokuIndex, Variable};

/// Solves a Sudoku given as rows of digits, `0` marking blanks.
///
/// # Returns
///
/// The completed grid, or an empty `Vec` (no rows at all) if the clues admit
/// no completion.
///
/// # Errors
///
/// [`SudokuError`] if the grid is not a supported square size or holds a
/// digit larger than its side, or if the oracle fails.
pub fn solve_sudoku(grid: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, SudokuError> {
    let sudoku = Sudoku::new(Board::new(grid.to_vec()))?;
    Ok(sudoku.solve()?.map(Vec::from).unwrap_or_default())
}
