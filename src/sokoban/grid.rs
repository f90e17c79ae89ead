#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The static Sokoban level: walls, start positions and goals.
//!
//! Parsing happens once. It fixes the identity of every box ([`BoxId`], in
//! row-major discovery order) and afterwards the level is read-only.
//! [`Position`]s are only handed out by a [`Grid`], so every coordinate that
//! reaches the encoder lies inside the level.

use crate::sokoban::SokobanError;
use bit_vec::BitVec;
use std::fmt::Display;
use std::str::FromStr;

/// The symbol found in one cell of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// `#`
    Wall,
    /// `.` or a space.
    Empty,
    /// `P`
    PlayerStart,
    /// `B`
    BoxStart,
    /// `G`
    Goal,
    /// `*`: a box starting on a goal.
    BoxOnGoal,
    /// `+`: the player starting on a goal.
    PlayerOnGoal,
}

impl CellKind {
    /// Whether the cell is a wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Whether the player starts here.
    #[must_use]
    pub const fn has_player(self) -> bool {
        matches!(self, Self::PlayerStart | Self::PlayerOnGoal)
    }

    /// Whether a box starts here.
    #[must_use]
    pub const fn has_box(self) -> bool {
        matches!(self, Self::BoxStart | Self::BoxOnGoal)
    }

    /// Whether the cell is a goal.
    #[must_use]
    pub const fn has_goal(self) -> bool {
        matches!(self, Self::Goal | Self::BoxOnGoal | Self::PlayerOnGoal)
    }

    /// The input symbol of this kind.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => '.',
            Self::PlayerStart => 'P',
            Self::BoxStart => 'B',
            Self::Goal => 'G',
            Self::BoxOnGoal => '*',
            Self::PlayerOnGoal => '+',
        }
    }
}

impl TryFrom<char> for CellKind {
    type Error = char;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '#' => Ok(Self::Wall),
            '.' | ' ' => Ok(Self::Empty),
            'P' => Ok(Self::PlayerStart),
            'B' => Ok(Self::BoxStart),
            'G' => Ok(Self::Goal),
            '*' => Ok(Self::BoxOnGoal),
            '+' => Ok(Self::PlayerOnGoal),
            other => Err(other),
        }
    }
}

/// A cell of a [`Grid`]: `x` is the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Position {
    pub(crate) const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The row.
    #[must_use]
    pub const fn x(self) -> usize {
        self.x
    }

    /// The column.
    #[must_use]
    pub const fn y(self) -> usize {
        self.y
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One player step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// One row up, `(-1, 0)`.
    Up,
    /// One row down, `(1, 0)`.
    Down,
    /// One column left, `(0, -1)`.
    Left,
    /// One column right, `(0, 1)`.
    Right,
}

impl Move {
    /// All four moves, in the order neighbours are enumerated.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The unit vector of the move as (row delta, column delta).
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// The move whose unit vector is `delta`, if any.
    #[must_use]
    pub fn from_delta(delta: (isize, isize)) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.delta() == delta)
    }

    /// The move in the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The single-letter name: `U`, `D`, `L` or `R`.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The identity of a box, fixed at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(usize);

impl BoxId {
    /// The box's index, `0..num_boxes`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }
}

impl Display for BoxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "box {}", self.0)
    }
}

/// A parsed Sokoban level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    walls: BitVec,
    player: Position,
    boxes: Vec<Position>,
    goals: Vec<Position>,
}

impl Grid {
    /// Builds a level from a rectangular matrix of cell kinds.
    ///
    /// Boxes are numbered in row-major order of discovery.
    ///
    /// # Errors
    ///
    /// [`SokobanError::EmptyGrid`] if there are no cells,
    /// [`SokobanError::RaggedRow`] if rows differ in length,
    /// [`SokobanError::MissingPlayer`] / [`SokobanError::MultiplePlayers`]
    /// unless exactly one cell holds the player.
    pub fn new(cells: &[Vec<CellKind>]) -> Result<Self, SokobanError> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(SokobanError::EmptyGrid);
        }

        let mut walls = BitVec::from_elem(rows * cols, false);
        let mut player = None;
        let mut boxes = Vec::new();
        let mut goals = Vec::new();

        for (x, row) in cells.iter().enumerate() {
            if row.len() != cols {
                return Err(SokobanError::RaggedRow {
                    row: x,
                    len: row.len(),
                    expected: cols,
                });
            }
            for (y, &kind) in row.iter().enumerate() {
                let pos = Position::new(x, y);
                if kind.is_wall() {
                    walls.set(x * cols + y, true);
                }
                if kind.has_player() {
                    if let Some(first) = player {
                        return Err(SokobanError::MultiplePlayers { first, second: pos });
                    }
                    player = Some(pos);
                }
                if kind.has_box() {
                    boxes.push(pos);
                }
                if kind.has_goal() {
                    goals.push(pos);
                }
            }
        }

        let player = player.ok_or(SokobanError::MissingPlayer)?;
        if boxes.len() != goals.len() {
            log::debug!(
                "level has {} boxes but {} goals; the goal condition may be unsatisfiable",
                boxes.len(),
                goals.len()
            );
        }

        Ok(Self {
            rows,
            cols,
            walls,
            player,
            boxes,
            goals,
        })
    }

    /// Builds a level from a rectangular matrix of symbols (see
    /// [`CellKind`]).
    ///
    /// # Errors
    ///
    /// [`SokobanError::UnknownSymbol`] for an unrecognised symbol, plus the
    /// errors of [`Grid::new`].
    pub fn from_symbols(symbols: &[Vec<char>]) -> Result<Self, SokobanError> {
        let cells = symbols
            .iter()
            .enumerate()
            .map(|(x, row)| {
                row.iter()
                    .enumerate()
                    .map(|(y, &ch)| {
                        CellKind::try_from(ch).map_err(|symbol| SokobanError::UnknownSymbol {
                            row: x,
                            col: y,
                            symbol,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&cells)
    }

    /// Number of rows (`N`).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`M`).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at (`x`, `y`), if inside the level.
    #[must_use]
    pub const fn position(&self, x: usize, y: usize) -> Option<Position> {
        if x < self.rows && y < self.cols {
            Some(Position::new(x, y))
        } else {
            None
        }
    }

    /// Whether `pos` is a wall.
    #[must_use]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.get(pos.x * self.cols + pos.y).unwrap_or(true)
    }

    /// Whether `pos` is a goal.
    #[must_use]
    pub fn is_goal(&self, pos: Position) -> bool {
        self.goals.contains(&pos)
    }

    /// The cell one `mv` away from `pos`, if it is inside the level.
    #[must_use]
    pub fn step(&self, pos: Position, mv: Move) -> Option<Position> {
        let (dx, dy) = mv.delta();
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        self.position(x, y)
    }

    /// The cell one `mv` away from `pos`, if it is inside the level and not
    /// a wall.
    #[must_use]
    pub fn open_step(&self, pos: Position, mv: Move) -> Option<Position> {
        self.step(pos, mv).filter(|&p| !self.is_wall(p))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |x| (0..self.cols).map(move |y| Position::new(x, y)))
    }

    /// All non-wall cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(move |&p| !self.is_wall(p))
    }

    /// All wall cells in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(move |&p| self.is_wall(p))
    }

    /// Where the player starts.
    #[must_use]
    pub const fn player_start(&self) -> Position {
        self.player
    }

    /// Number of boxes.
    #[must_use]
    pub fn num_boxes(&self) -> usize {
        self.boxes.len()
    }

    /// Every box with its start position, in identity order.
    pub fn boxes(&self) -> impl Iterator<Item = (BoxId, Position)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .map(|(i, &pos)| (BoxId::new(i), pos))
    }

    /// All box identities.
    pub fn box_ids(&self) -> impl Iterator<Item = BoxId> + Clone + use<> {
        (0..self.boxes.len()).map(BoxId::new)
    }

    /// The goal cells in row-major order.
    #[must_use]
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    /// The symbol to draw at `pos` for the given dynamic state.
    pub(crate) fn render_cell(&self, pos: Position, player: Position, boxes: &[Position]) -> char {
        let goal = self.is_goal(pos);
        if self.is_wall(pos) {
            CellKind::Wall.symbol()
        } else if pos == player {
            if goal { CellKind::PlayerOnGoal.symbol() } else { CellKind::PlayerStart.symbol() }
        } else if boxes.contains(&pos) {
            if goal { CellKind::BoxOnGoal.symbol() } else { CellKind::BoxStart.symbol() }
        } else if goal {
            CellKind::Goal.symbol()
        } else {
            CellKind::Empty.symbol()
        }
    }
}

/// Parses a level from text, one row per line.
///
/// Blank lines before and after the level are skipped. Lines shorter than
/// the longest one are padded with walls, so levels may be written without
/// trailing wall characters.
impl FromStr for Grid {
    type Err = SokobanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let end = lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
        let lines = &lines[..end];

        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let symbols: Vec<Vec<char>> = lines
            .iter()
            .map(|l| {
                let mut row: Vec<char> = l.chars().collect();
                row.resize(width, CellKind::Wall.symbol());
                row
            })
            .collect();

        Self::from_symbols(&symbols)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for x in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|y| self.render_cell(Position::new(x, y), self.player, &self.boxes))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn grid(rows: &[&str]) -> Result<Grid, SokobanError> {
        let symbols = rows.iter().map(|r| r.chars().collect_vec()).collect_vec();
        Grid::from_symbols(&symbols)
    }

    #[test]
    fn test_parse_extracts_entities() {
        let g = grid(&["#####", "#PBG#", "#B*G#", "#####"]).unwrap();
        assert_eq!((g.rows(), g.cols()), (4, 5));
        assert_eq!(g.player_start(), Position::new(1, 1));
        assert_eq!(
            g.boxes().collect_vec(),
            vec![
                (BoxId::new(0), Position::new(1, 2)),
                (BoxId::new(1), Position::new(2, 1)),
                (BoxId::new(2), Position::new(2, 2)),
            ]
        );
        assert_eq!(
            g.goals(),
            &[Position::new(1, 3), Position::new(2, 2), Position::new(2, 3)]
        );
        assert_eq!(g.wall_cells().count(), 14);
        assert_eq!(g.open_cells().count(), 6);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(grid(&[]), Err(SokobanError::EmptyGrid)));
        assert!(matches!(grid(&["#.#"]), Err(SokobanError::MissingPlayer)));
        assert!(matches!(grid(&["P+"]), Err(SokobanError::MultiplePlayers { .. })));
        assert!(matches!(
            grid(&["P.", "."]),
            Err(SokobanError::RaggedRow { row: 1, len: 1, expected: 2 })
        ));
        assert!(matches!(
            grid(&["P?"]),
            Err(SokobanError::UnknownSymbol { row: 0, col: 1, symbol: '?' })
        ));
    }

    #[test]
    fn test_steps_stay_inside() {
        let g = grid(&["P.#"]).unwrap();
        let origin = g.position(0, 0).unwrap();
        assert_eq!(g.step(origin, Move::Up), None);
        assert_eq!(g.step(origin, Move::Left), None);
        assert_eq!(g.step(origin, Move::Right), Some(Position::new(0, 1)));
        assert_eq!(g.open_step(Position::new(0, 1), Move::Right), None);
        assert_eq!(g.step(Position::new(0, 1), Move::Right), Some(Position::new(0, 2)));
        assert_eq!(g.position(1, 0), None);
    }

    #[test]
    fn test_move_vectors() {
        for mv in Move::ALL {
            assert_eq!(Move::from_delta(mv.delta()), Some(mv));
            let (dx, dy) = mv.delta();
            assert_eq!(mv.opposite().delta(), (-dx, -dy));
        }
        assert_eq!(Move::from_delta((0, 0)), None);
        assert_eq!(Move::from_delta((1, 1)), None);
    }

    #[test]
    fn test_from_str_pads_with_walls() {
        let g: Grid = "\n#####\n#P B\n#####\n\n".parse().unwrap();
        assert_eq!((g.rows(), g.cols()), (3, 5));
        assert!(g.is_wall(Position::new(1, 4)));
        assert!(!g.is_wall(Position::new(1, 2)));
        assert_eq!(g.to_string(), "#####\n#P.B#\n#####\n");
    }
}
