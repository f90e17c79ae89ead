#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Plays a move sequence against the rules, independently of the encoding.
//!
//! Used to check plans coming out of the solver.

use crate::sokoban::grid::{Grid, Move, Position};
use std::fmt::Display;

/// Why a move could not be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Blocked {
    /// The player would walk into a wall or off the level.
    #[display("the player would hit a wall")]
    Wall,
    /// The pushed box would hit a wall, leave the level or hit another box.
    #[display("the box cannot be pushed")]
    Box,
}

/// A plan step that breaks the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("move {step} ({mv}) is illegal: {reason}")]
pub struct ReplayError {
    /// 0-based index of the move in the plan.
    pub step: usize,
    /// The move itself.
    pub mv: Move,
    /// What blocks it.
    #[error(not(source))]
    pub reason: Blocked,
}

/// The dynamic part of a level: where the player and each box are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<'a> {
    grid: &'a Grid,
    player: Position,
    boxes: Vec<Position>,
}

impl<'a> State<'a> {
    /// The start state of `grid`.
    #[must_use]
    pub fn initial(grid: &'a Grid) -> Self {
        Self {
            grid,
            player: grid.player_start(),
            boxes: grid.boxes().map(|(_, pos)| pos).collect(),
        }
    }

    /// The player's cell.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// The box cells, in box identity order.
    #[must_use]
    pub fn boxes(&self) -> &[Position] {
        &self.boxes
    }

    /// Whether every box rests on a goal.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.boxes.iter().all(|&b| self.grid.is_goal(b))
    }

    /// Plays one move, pushing a box if one is in the way.
    ///
    /// # Errors
    ///
    /// The [`Blocked`] reason if the move is illegal; the state is unchanged
    /// in that case.
    pub fn apply(&mut self, mv: Move) -> Result<(), Blocked> {
        let target = self.grid.open_step(self.player, mv).ok_or(Blocked::Wall)?;

        if let Some(i) = self.boxes.iter().position(|&b| b == target) {
            let pushed = self
                .grid
                .open_step(target, mv)
                .filter(|p| !self.boxes.contains(p))
                .ok_or(Blocked::Box)?;
            self.boxes[i] = pushed;
        }

        self.player = target;
        Ok(())
    }
}

impl Display for State<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for x in 0..self.grid.rows() {
            let line: String = (0..self.grid.cols())
                .filter_map(|y| self.grid.position(x, y))
                .map(|p| self.grid.render_cell(p, self.player, &self.boxes))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Plays `moves` from the start of `grid`.
///
/// # Returns
///
/// The final state; check [`State::is_solved`] to see whether the plan
/// actually solves the level.
///
/// # Errors
///
/// [`ReplayError`] at the first illegal move.
pub fn replay<'a>(grid: &'a Grid, moves: &[Move]) -> Result<State<'a>, ReplayError> {
    let mut state = State::initial(grid);
    for (step, &mv) in moves.iter().enumerate() {
        state
            .apply(mv)
            .map_err(|reason| ReplayError { step, mv, reason })?;
    }
    Ok(state)
}
