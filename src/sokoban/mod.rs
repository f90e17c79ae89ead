#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bounded-horizon Sokoban planning by reduction to SAT.
//!
//! A level is parsed into a [`Grid`], its fluents are numbered by a
//! [`SokobanIndex`], [`Sokoban::to_cnf`] turns the rules into CNF for a fixed
//! number of steps and [`decoder`] reads the player's moves back out of a
//! model.
//! [`replay`] checks a plan against the rules directly.

/// Reading moves out of a model.
pub mod decoder;
/// The planning formula.
mod encoder;
/// Levels, cells, moves and box identities.
pub mod grid;
/// Variable numbering for player and box fluents.
pub mod index;
/// Plan checking.
pub mod replay;
/// Encode, solve and decode in one step.
pub mod solver;

pub use grid::{BoxId, CellKind, Grid, Move, Position};
pub use index::{Fluent, SokobanIndex};
pub use replay::{ReplayError, State};
pub use solver::Sokoban;

use crate::sat::oracle::OracleError;
use std::path::Path;

/// Errors raised while building or solving a Sokoban level.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SokobanError {
    /// The level has no cells.
    #[display("the level is empty")]
    EmptyGrid,
    /// A row does not have as many cells as the first.
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// 0-based row index.
        row: usize,
        /// Cells found.
        len: usize,
        /// Cells expected.
        expected: usize,
    },
    /// A cell holds a character that is not a level symbol.
    #[display("unknown symbol '{symbol}' at ({row}, {col})")]
    UnknownSymbol {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        col: usize,
        /// The offending character.
        symbol: char,
    },
    /// No cell holds the player.
    #[display("the level has no player")]
    MissingPlayer,
    /// More than one cell holds the player.
    #[display("the level has more than one player: {first} and {second}")]
    MultiplePlayers {
        /// The first player cell found.
        first: Position,
        /// The second player cell found.
        second: Position,
    },
    /// The fluents do not fit in the DIMACS variable range.
    #[display("{rows}x{cols} level with {boxes} boxes over {horizon} steps needs too many variables")]
    TooLarge {
        /// Rows of the level.
        rows: usize,
        /// Columns of the level.
        cols: usize,
        /// Number of boxes.
        boxes: usize,
        /// The requested horizon.
        horizon: usize,
    },
    /// Reading the level file failed.
    #[display("failed to read Sokoban file: {_0}")]
    #[from]
    Io(std::io::Error),
    /// The oracle failed.
    #[display("{_0}")]
    #[from]
    Oracle(OracleError),
}

/// Reads a level file; see the [`std::str::FromStr`] impl of [`Grid`].
///
/// # Errors
///
/// [`SokobanError::Io`] if the file cannot be read, otherwise any parse
/// error.
pub fn parse_sokoban_file(path: impl AsRef<Path>) -> Result<Grid, SokobanError> {
    std::fs::read_to_string(path)?.parse()
}

/// Plans a solution for a level given as rows of symbols.
///
/// Symbols: `#` wall, `.` or space empty, `P` player, `B` box, `G` goal,
/// `*` box on goal, `+` player on goal.
///
/// # Returns
///
/// `Some(moves)` for a plan of at most `horizon` moves that leaves every box
/// on a goal (empty if the level is already solved), or `None` if there is
/// none within the horizon.
///
/// # Errors
///
/// [`SokobanError`] if the level is malformed or the oracle fails.
pub fn solve_sokoban(grid: &[Vec<char>], horizon: usize) -> Result<Option<Vec<Move>>, SokobanError> {
    Sokoban::new(Grid::from_symbols(grid)?, horizon)?.solve()
}
