#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku to CNF and back.
//!
//! Every proposition "cell (row, col) holds num" gets one variable from a
//! [`SudokuIndex`]. The rules are produced one family at a time (clues, cells,
//! rows, columns, blocks), each as its own clause batch, and
//! [`Sudoku::to_cnf`] concatenates them.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::{Clause, Cnf, Var, exactly_one, pos};
use crate::sat::indexer::Packer;
use crate::sat::oracle::{Oracle, OracleError, SatResult, SplrOracle};
use itertools::Itertools;
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

/// Errors raised while building or solving a Sudoku.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SudokuError {
    /// The board side is not one of the supported sizes.
    #[display("unsupported board size {size}; expected 4, 9, 16 or 25 rows")]
    UnsupportedSize {
        /// Number of rows found.
        size: usize,
    },
    /// A row does not have as many cells as the board has rows.
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// 0-based row index.
        row: usize,
        /// Cells found.
        len: usize,
        /// Cells expected.
        expected: usize,
    },
    /// A clue is larger than the board side.
    #[display("cell ({row}, {col}) holds {digit}, expected 0..={max}")]
    DigitOutOfRange {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        col: usize,
        /// The offending value.
        digit: usize,
        /// The largest allowed digit.
        max: usize,
    },
    /// A puzzle file contains something that is not a digit.
    #[display("line {line}: invalid token '{token}'")]
    InvalidToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        #[error(not(source))]
        token: String,
    },
    /// Reading the puzzle file failed.
    #[display("failed to read Sudoku file: {_0}")]
    #[from]
    Io(std::io::Error),
    /// The oracle failed.
    #[display("{_0}")]
    #[from]
    Oracle(OracleError),
}

/// A square grid of digits; `0` marks a blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    /// Wraps rows of digits. No validation happens here; see [`Sudoku::new`].
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the board has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The digit at (`row`, `col`), `0` if blank.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.0[row][col]
    }

    /// The rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Checks that `self` is a complete, valid solution of `puzzle`.
    ///
    /// Every row, column and block must hold each digit `1..=n` exactly
    /// once, and every clue of `puzzle` must be unchanged.
    #[must_use]
    pub fn is_solution_of(&self, puzzle: &Self) -> bool {
        let Ok(size) = Size::try_from(self.len()) else {
            return false;
        };
        let n = usize::from(size);
        let b = size.block_size();

        if puzzle.len() != n || self.0.iter().chain(&puzzle.0).any(|r| r.len() != n) {
            return false;
        }

        let is_permutation = |cells: Vec<usize>| cells.into_iter().sorted().eq(1..=n);

        let rows_ok = (0..n).all(|r| is_permutation((0..n).map(|c| self.get(r, c)).collect()));
        let cols_ok = (0..n).all(|c| is_permutation((0..n).map(|r| self.get(r, c)).collect()));
        let blocks_ok = (0..n).step_by(b).cartesian_product((0..n).step_by(b)).all(|(br, bc)| {
            is_permutation(
                (br..br + b)
                    .cartesian_product(bc..bc + b)
                    .map(|(r, c)| self.get(r, c))
                    .collect(),
            )
        });
        let clues_ok = (0..n)
            .cartesian_product(0..n)
            .all(|(r, c)| puzzle.get(r, c) == 0 || puzzle.get(r, c) == self.get(r, c));

        rows_ok && cols_ok && blocks_ok && clues_ok
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Board {
    fn from(board: [[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.len();
        let b = Size::try_from(n).map_or(n.max(1), Size::block_size);
        let width = if n > 9 { 2 } else { 1 };

        for (r, row) in self.0.iter().enumerate() {
            if r > 0 && r % b == 0 {
                let rule = (0..n / b).map(|_| "-".repeat(b * (width + 1) - 1)).join("-+-");
                writeln!(f, "{rule}")?;
            }
            let line = row
                .chunks(b)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|&d| {
                            if d == 0 {
                                format!("{:>width$}", ".")
                            } else {
                                format!("{d:>width$}")
                            }
                        })
                        .join(" ")
                })
                .join(" | ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A small 4x4 puzzle.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[1, 0, 0, 4], [0, 0, 1, 0], [0, 1, 0, 0], [4, 0, 0, 1]];

/// A standard 9x9 puzzle with a unique solution ([`EXAMPLE_NINE_SOLUTION`]).
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// The unique solution of [`EXAMPLE_NINE`].
pub const EXAMPLE_NINE_SOLUTION: [[usize; 9]; 9] = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

/// A 16x16 puzzle.
pub const EXAMPLE_SIXTEEN: [[usize; 16]; 16] = [
    [0, 11, 0, 0, 0, 2, 3, 14, 0, 0, 9, 12, 0, 0, 0, 16],
    [15, 12, 0, 0, 0, 11, 0, 1, 13, 10, 0, 0, 0, 0, 7, 2],
    [0, 0, 10, 0, 0, 0, 0, 0, 16, 11, 0, 1, 6, 4, 12, 3],
    [0, 16, 14, 1, 0, 4, 0, 6, 0, 3, 0, 15, 0, 8, 0, 0],
    [1, 6, 5, 12, 0, 0, 11, 0, 0, 9, 8, 0, 0, 0, 0, 0],
    [0, 0, 0, 7, 14, 1, 8, 0, 0, 15, 6, 0, 13, 5, 0, 4],
    [4, 15, 8, 0, 9, 13, 0, 0, 0, 0, 7, 16, 3, 0, 0, 0],
    [0, 9, 13, 0, 0, 0, 0, 15, 10, 0, 0, 0, 7, 6, 0, 11],
    [14, 0, 6, 11, 0, 0, 0, 12, 7, 0, 0, 0, 0, 3, 13, 0],
    [0, 0, 0, 5, 8, 14, 0, 0, 0, 0, 13, 11, 0, 1, 2, 6],
    [13, 0, 16, 4, 0, 15, 5, 0, 0, 1, 12, 6, 8, 0, 0, 0],
    [0, 0, 0, 0, 0, 16, 10, 0, 0, 8, 0, 0, 11, 9, 4, 5],
    [0, 0, 11, 0, 1, 0, 14, 0, 5, 0, 3, 0, 15, 7, 16, 0],
    [5, 13, 15, 3, 16, 0, 4, 7, 0, 0, 0, 0, 0, 2, 0, 0],
    [16, 1, 0, 0, 0, 0, 12, 2, 14, 0, 15, 0, 0, 0, 3, 8],
    [9, 0, 0, 0, 13, 5, 0, 0, 8, 6, 16, 0, 0, 0, 10, 0],
];

/// The supported board sides.
#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord, Hash)]
pub enum Size {
    /// 4x4 with 2x2 blocks.
    Four = 4,
    /// 9x9 with 3x3 blocks.
    Nine = 9,
    /// 16x16 with 4x4 blocks.
    Sixteen = 16,
    /// 25x25 with 5x5 blocks.
    TwentyFive = 25,
}

impl TryFrom<usize> for Size {
    type Error = SudokuError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            size => Err(SudokuError::UnsupportedSize { size }),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size as Self
    }
}

impl Size {
    /// Side of one block.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }
}

/// The proposition "cell (`row`, `col`) holds `num`".
///
/// `row` and `col` are 0-based; `num` is the digit itself, `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    /// 0-based row.
    pub row: usize,
    /// 0-based column.
    pub col: usize,
    /// The digit, 1-based.
    pub num: usize,
}

impl Variable {
    /// Creates a proposition.
    #[must_use]
    pub const fn new(row: usize, col: usize, num: usize) -> Self {
        Self { row, col, num }
    }
}

/// The bijection between Sudoku propositions and variable IDs.
///
/// A [`Packer`] over (row, col, num - 1) with every field bounded by the
/// board side, starting at ID 1. For a 9x9 board the IDs are `1..=729`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SudokuIndex {
    packer: Packer<3>,
    size: Size,
}

impl SudokuIndex {
    /// Builds the index for a board side.
    #[must_use]
    pub fn new(size: Size) -> Option<Self> {
        let n = usize::from(size);
        Packer::new([n, n, n], 1).map(|packer| Self { packer, size })
    }

    /// The variable of a proposition, or `None` if any coordinate or the
    /// digit is out of range.
    #[must_use]
    pub fn encode(&self, var: Variable) -> Option<Var> {
        let num = var.num.checked_sub(1)?;
        self.packer.pack([var.row, var.col, num])
    }

    /// The variable of "cell (`row`, `col`) holds `num`" for coordinates
    /// the encoder itself enumerated.
    fn var(&self, row: usize, col: usize, num: usize) -> Var {
        self.packer
            .pack([row, col, num - 1])
            .expect("encoder enumerates in-range cells and digits")
    }

    /// The proposition behind a variable, or `None` if the ID is not one of
    /// this index's.
    #[must_use]
    pub fn decode(&self, var: Var) -> Option<Variable> {
        self.packer
            .unpack(var)
            .map(|[row, col, num]| Variable::new(row, col, num + 1))
    }

    /// Number of variables.
    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.packer.len()
    }

    fn n(&self) -> usize {
        usize::from(self.size)
    }
}

/// A validated Sudoku puzzle together with its variable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    /// The puzzle.
    pub board: Board,
    /// The board side.
    pub size: Size,
    index: SudokuIndex,
}

impl Sudoku {
    /// Validates a board and fixes its variable index.
    ///
    /// # Errors
    ///
    /// [`SudokuError::UnsupportedSize`] if the side is not 4, 9, 16 or 25,
    /// [`SudokuError::RaggedRow`] if the board is not square,
    /// [`SudokuError::DigitOutOfRange`] if a clue exceeds the side.
    pub fn new(board: Board) -> Result<Self, SudokuError> {
        let size = Size::try_from(board.len())?;
        let n = usize::from(size);

        for (row, cells) in board.0.iter().enumerate() {
            if cells.len() != n {
                return Err(SudokuError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: n,
                });
            }
            if let Some((col, &digit)) = cells.iter().enumerate().find(|&(_, &d)| d > n) {
                return Err(SudokuError::DigitOutOfRange {
                    row,
                    col,
                    digit,
                    max: n,
                });
            }
        }

        let index = SudokuIndex::new(size).ok_or(SudokuError::UnsupportedSize { size: n })?;
        Ok(Self { board, size, index })
    }

    /// The variable index used by [`Sudoku::to_cnf`] and
    /// [`Sudoku::decode`].
    #[must_use]
    pub const fn index(&self) -> &SudokuIndex {
        &self.index
    }

    /// Encodes the puzzle.
    ///
    /// The formula is satisfiable exactly when the puzzle has a completion,
    /// and its models are in one-to-one correspondence with the completions.
    #[must_use]
    pub fn to_cnf(&self) -> Cnf {
        Cnf::from_batches([
            generate_pre_filled_clauses(&self.index, &self.board),
            generate_cell_clauses(&self.index, &self.board),
            generate_row_clauses(&self.index),
            generate_col_clauses(&self.index),
            generate_block_clauses(&self.index),
        ])
    }

    /// Reads a solved board out of a satisfying assignment.
    ///
    /// Every true variable names one (row, col, num) and writes `num` into
    /// that cell. A cell written twice, or left blank, means the assignment
    /// does not come from this puzzle's formula; that is logged and treated
    /// as no solution.
    #[must_use]
    pub fn decode(&self, assignment: &Assignment) -> Option<Board> {
        let n = usize::from(self.size);
        let mut board = vec![vec![0; n]; n];

        for var in assignment.true_vars() {
            let Some(Variable { row, col, num }) = self.index.decode(var) else {
                continue;
            };
            if board[row][col] != 0 {
                log::warn!(
                    "malformed assignment: cell ({row}, {col}) holds both {} and {num}",
                    board[row][col]
                );
                return None;
            }
            board[row][col] = num;
        }

        if let Some((row, col)) = (0..n).cartesian_product(0..n).find(|&(r, c)| board[r][c] == 0) {
            log::warn!("malformed assignment: cell ({row}, {col}) holds no digit");
            return None;
        }

        Some(Board::new(board))
    }

    /// Encodes, solves with `oracle` and decodes.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the puzzle has no solution.
    ///
    /// # Errors
    ///
    /// [`SudokuError::Oracle`] if the oracle fails.
    pub fn solve_with<O: Oracle + ?Sized>(&self, oracle: &mut O) -> Result<Option<Board>, SudokuError> {
        let time = Instant::now();
        let cnf = self.to_cnf();
        log::debug!(
            "encoded {n}x{n} sudoku: {} variables, {} clauses in {:?}",
            cnf.num_vars,
            cnf.len(),
            time.elapsed(),
            n = usize::from(self.size),
        );

        let time = Instant::now();
        let result = oracle.solve(&cnf)?;
        log::debug!("oracle returned in {:?}", time.elapsed());

        let solution = match result {
            SatResult::Satisfiable(assignment) => self.decode(&assignment),
            SatResult::Unsatisfiable => None,
        };
        log::info!(
            "sudoku {}",
            if solution.is_some() { "solved" } else { "has no solution" }
        );
        Ok(solution)
    }

    /// Solves with the default oracle.
    ///
    /// # Errors
    ///
    /// See [`Sudoku::solve_with`].
    pub fn solve(&self) -> Result<Option<Board>, SudokuError> {
        self.solve_with(&mut SplrOracle)
    }
}

impl TryFrom<Board> for Sudoku {
    type Error = SudokuError;

    fn try_from(board: Board) -> Result<Self, Self::Error> {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board)
    }
}

/// A unit clause per clue.
fn generate_pre_filled_clauses(index: &SudokuIndex, board: &Board) -> Vec<Clause> {
    let mut clauses = vec![];
    for (r, row) in board.rows().enumerate() {
        for (c, &n) in row.iter().enumerate() {
            if n != 0 {
                clauses.push(Clause::from_slice(&[pos(index.var(r, c, n))]));
            }
        }
    }
    clauses
}

/// Exactly one digit in every blank cell. Clue cells are pinned by their unit
/// clause and need nothing more: the per-digit house constraints leave no
/// room for a second digit there.
fn generate_cell_clauses(index: &SudokuIndex, board: &Board) -> Vec<Clause> {
    let n = index.n();
    let mut clauses = vec![];
    for row in 0..n {
        for col in 0..n {
            if board.get(row, col) != 0 {
                continue;
            }
            let vars = (1..=n).map(|num| index.var(row, col, num)).collect_vec();
            clauses.extend(exactly_one(&vars));
        }
    }
    clauses
}

/// Every digit exactly once per row.
fn generate_row_clauses(index: &SudokuIndex) -> Vec<Clause> {
    let n = index.n();
    let mut clauses = vec![];
    for row in 0..n {
        for num in 1..=n {
            let vars = (0..n).map(|col| index.var(row, col, num)).collect_vec();
            clauses.extend(exactly_one(&vars));
        }
    }
    clauses
}

/// Every digit exactly once per column.
fn generate_col_clauses(index: &SudokuIndex) -> Vec<Clause> {
    let n = index.n();
    let mut clauses = vec![];
    for col in 0..n {
        for num in 1..=n {
            let vars = (0..n).map(|row| index.var(row, col, num)).collect_vec();
            clauses.extend(exactly_one(&vars));
        }
    }
    clauses
}

/// Every digit exactly once per block.
fn generate_block_clauses(index: &SudokuIndex) -> Vec<Clause> {
    let n = index.n();
    let block_size = index.size.block_size();
    let mut clauses = Vec::new();
    for br in (0..n).step_by(block_size) {
        for bc in (0..n).step_by(block_size) {
            for num in 1..=n {
                let vars = (br..br + block_size)
                    .cartesian_product(bc..bc + block_size)
                    .map(|(r, c)| index.var(r, c, num))
                    .collect_vec();
                clauses.extend(exactly_one(&vars));
            }
        }
    }
    clauses
}

/// Parses the text of a Sudoku file into a board.
///
/// One row per line. A line is either whitespace-separated integers or, for
/// boards up to 9x9, a compact string of digits. `0` and `.` are blanks.
/// Empty lines and lines starting with `#` or `c` are skipped.
///
/// # Errors
///
/// [`SudokuError::InvalidToken`] on anything that is not a digit; size errors
/// are reported later by [`Sudoku::new`].
pub fn parse_sudoku(input: &str) -> Result<Board, SudokuError> {
    let parse_token = |line: usize, token: &str| -> Result<usize, SudokuError> {
        if token == "." {
            return Ok(0);
        }
        token.parse::<usize>().map_err(|_| SudokuError::InvalidToken {
            line,
            token: token.to_string(),
        })
    };

    let mut rows = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('c') {
            continue;
        }

        let row = if line.contains(char::is_whitespace) {
            line.split_whitespace()
                .map(|token| parse_token(idx + 1, token))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            line.chars()
                .map(|ch| parse_token(idx + 1, &ch.to_string()))
                .collect::<Result<Vec<_>, _>>()?
        };
        rows.push(row);
    }

    Ok(Board::new(rows))
}

/// Reads and validates a Sudoku file.
///
/// # Errors
///
/// [`SudokuError::Io`] if the file cannot be read, plus the errors of
/// [`parse_sudoku`] and [`Sudoku::new`].
pub fn parse_sudoku_file(path: impl AsRef<Path>) -> Result<Sudoku, SudokuError> {
    let input = std::fs::read_to_string(path)?;
    Sudoku::new(parse_sudoku(&input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cnf::var_of;
    use crate::sat::oracle::solve;

    fn nine() -> Sudoku {
        Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap()
    }

    #[test]
    fn test_index_covers_729_distinct_ids() {
        let index = SudokuIndex::new(Size::Nine).unwrap();
        let ids = (0..9)
            .cartesian_product(0..9)
            .cartesian_product(1..=9)
            .map(|((r, c), d)| index.encode(Variable::new(r, c, d)).unwrap())
            .sorted()
            .collect_vec();
        assert_eq!(ids, (1..=729).collect_vec());
        assert_eq!(index.num_vars(), 729);
    }

    #[test]
    fn test_index_decode_inverts_encode() {
        let index = SudokuIndex::new(Size::Nine).unwrap();
        let v = Variable::new(8, 0, 9);
        assert_eq!(index.decode(index.encode(v).unwrap()), Some(v));
        assert_eq!(index.encode(Variable::new(0, 0, 0)), None);
        assert_eq!(index.encode(Variable::new(0, 0, 10)), None);
        assert_eq!(index.encode(Variable::new(9, 0, 1)), None);
        assert_eq!(index.decode(730), None);
    }

    #[test]
    fn test_pre_filled_clauses_are_units() {
        let sudoku = nine();
        let clauses = generate_pre_filled_clauses(&sudoku.index, &sudoku.board);
        let clues = EXAMPLE_NINE.iter().flatten().filter(|&&d| d != 0).count();
        assert_eq!(clauses.len(), clues);
        assert!(clauses.iter().all(|c| c.len() == 1 && c[0] > 0));

        let first = sudoku.index.decode(var_of(clauses[0][0])).unwrap();
        assert_eq!(first, Variable::new(0, 0, 5));
    }

    #[test]
    fn test_cell_clauses_only_for_blanks() {
        let sudoku = nine();
        let clauses = generate_cell_clauses(&sudoku.index, &sudoku.board);
        let blanks = EXAMPLE_NINE.iter().flatten().filter(|&&d| d == 0).count();
        // One at-least-one clause of 9 literals plus C(9, 2) exclusions per blank.
        assert_eq!(clauses.len(), blanks * (1 + 36));
        assert_eq!(clauses.iter().filter(|c| c.len() == 9).count(), blanks);
    }

    #[test]
    fn test_house_clause_counts() {
        let index = SudokuIndex::new(Size::Nine).unwrap();
        let per_house = 9 * (1 + 36);
        assert_eq!(generate_row_clauses(&index).len(), 9 * per_house);
        assert_eq!(generate_col_clauses(&index).len(), 9 * per_house);
        assert_eq!(generate_block_clauses(&index).len(), 9 * per_house);
    }

    #[test]
    fn test_block_clause_spans_one_block() {
        let index = SudokuIndex::new(Size::Nine).unwrap();
        let clauses = generate_block_clauses(&index);
        let cells = clauses[0]
            .iter()
            .map(|&l| index.decode(var_of(l)).unwrap())
            .collect_vec();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|v| v.row < 3 && v.col < 3 && v.num == 1));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = nine().to_cnf();
        let b = nine().to_cnf();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.num_vars, b.num_vars);
        assert_eq!(a, b);
        assert!(a.num_vars <= 729);
    }

    #[test]
    fn test_solve_example_nine() {
        let solved = nine().solve().unwrap().unwrap();
        assert_eq!(solved, Board::from(EXAMPLE_NINE_SOLUTION));
        assert!(solved.is_solution_of(&Board::from(EXAMPLE_NINE)));
    }

    #[test]
    fn test_solve_example_four() {
        let puzzle = Board::from(EXAMPLE_FOUR);
        let solved = Sudoku::new(puzzle.clone()).unwrap().solve().unwrap().unwrap();
        assert!(solved.is_solution_of(&puzzle));
    }

    #[test]
    fn test_model_satisfies_formula() {
        let sudoku = nine();
        let cnf = sudoku.to_cnf();
        let assignment = solve(&cnf).unwrap().into_assignment().unwrap();
        assert!(cnf.verify(&assignment));
        assert!(sudoku.decode(&assignment).is_some());
    }

    #[test]
    fn test_duplicate_clue_in_row_unsat() {
        let mut grid = EXAMPLE_NINE;
        grid[0][2] = 5;
        let sudoku = Sudoku::new(Board::from(grid)).unwrap();
        assert_eq!(sudoku.solve().unwrap(), None);
    }

    #[test]
    fn test_decode_rejects_double_digit() {
        let sudoku = nine();
        let index = sudoku.index;
        let mut vars = EXAMPLE_NINE_SOLUTION
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &d)| (r, c, d)))
            .map(|(r, c, d)| index.var(r, c, d))
            .collect_vec();
        assert!(sudoku.decode(&vars.iter().copied().collect()).is_some());

        vars.push(index.var(0, 0, 1));
        assert_eq!(sudoku.decode(&vars.iter().copied().collect()), None);
    }

    #[test]
    fn test_decode_rejects_missing_cell() {
        let sudoku = nine();
        let assignment: Assignment = [sudoku.index.var(0, 0, 5)].into_iter().collect();
        assert_eq!(sudoku.decode(&assignment), None);
        assert_eq!(sudoku.decode(&Assignment::default()), None);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            Sudoku::new(Board::new(vec![vec![0; 9]; 8])),
            Err(SudokuError::UnsupportedSize { size: 8 })
        ));

        let mut ragged = vec![vec![0; 9]; 9];
        ragged[3].pop();
        assert!(matches!(
            Sudoku::new(Board::new(ragged)),
            Err(SudokuError::RaggedRow { row: 3, len: 8, expected: 9 })
        ));

        let mut big = vec![vec![0; 9]; 9];
        big[1][2] = 10;
        assert!(matches!(
            Sudoku::new(Board::new(big)),
            Err(SudokuError::DigitOutOfRange { row: 1, col: 2, digit: 10, max: 9 })
        ));
    }

    #[test]
    fn test_is_solution_of_rejects_changed_clue() {
        let mut solved = EXAMPLE_NINE_SOLUTION;
        assert!(Board::from(solved).is_solution_of(&Board::from(EXAMPLE_NINE)));
        solved[0].swap(0, 1);
        assert!(!Board::from(solved).is_solution_of(&Board::from(EXAMPLE_NINE)));
    }

    #[test]
    fn test_parse_sudoku_formats() {
        let compact = "53..7....\n6..195...\n.98....6.\n8...6...3\n4..8.3..1\n7...2...6\n.6....28.\n...419..5\n....8..79\n";
        assert_eq!(parse_sudoku(compact).unwrap(), Board::from(EXAMPLE_NINE));

        let spaced = "# comment\n1 0 0 4\n0 0 1 0\n\n0 1 0 0\n4 0 0 1\n";
        assert_eq!(parse_sudoku(spaced).unwrap(), Board::from(EXAMPLE_FOUR));

        assert!(matches!(
            parse_sudoku("1 2 x 4"),
            Err(SudokuError::InvalidToken { line: 1, .. })
        ));
    }

    #[test]
    fn test_display_marks_blocks() {
        let text = Board::from(EXAMPLE_FOUR).to_string();
        assert_eq!(text, "1 . | . 4\n. . | 1 .\n----+----\n. 1 | . .\n4 . | . 1\n");
    }
}
