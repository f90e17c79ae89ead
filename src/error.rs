#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The crate-level error type used by the command-line front-end.

use crate::sat::dimacs::DimacsError;
use crate::sat::oracle::OracleError;
use crate::sokoban::SokobanError;
use crate::sokoban::replay::ReplayError;
use crate::sudoku::SudokuError;
use std::path::PathBuf;

/// Any failure surfaced by the library.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum Error {
    /// A Sudoku could not be read or solved.
    #[display("{_0}")]
    #[from]
    Sudoku(SudokuError),
    /// A Sokoban level could not be read or solved.
    #[display("{_0}")]
    #[from]
    Sokoban(SokobanError),
    /// A DIMACS file could not be read.
    #[display("{_0}")]
    #[from]
    Dimacs(DimacsError),
    /// The oracle failed on a raw formula.
    #[display("{_0}")]
    #[from]
    Oracle(OracleError),
    /// A Sokoban plan did not survive replay.
    #[display("plan failed verification: {_0}")]
    #[from]
    Replay(ReplayError),
    /// A solution did not satisfy its puzzle or formula.
    #[display("solution of {} failed verification", path.display())]
    Verification {
        /// The input whose solution was rejected.
        #[error(not(source))]
        path: PathBuf,
    },
    /// The input path has no recognised extension.
    #[display("don't know how to solve {}", path.display())]
    UnknownInput {
        /// The offending path.
        #[error(not(source))]
        path: PathBuf,
    },
    /// Plain I/O, such as writing an exported formula.
    #[display("{_0}")]
    #[from]
    Io(std::io::Error),
}

/// Result alias over [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
