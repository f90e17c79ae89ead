#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading a move sequence out of a satisfying assignment.

use crate::sat::assignment::Assignment;
use crate::sokoban::grid::{Move, Position};
use crate::sokoban::index::{Fluent, SokobanIndex};

/// The player's cell at each step `0..=horizon`.
///
/// Returns `None`, after logging a warning, unless every step has exactly
/// one true player fluent.
#[must_use]
pub fn player_trajectory(index: &SokobanIndex, assignment: &Assignment) -> Option<Vec<Position>> {
    let mut trajectory: Vec<Option<Position>> = vec![None; index.horizon() + 1];

    for var in assignment.true_vars() {
        let Some(Fluent::PlayerAt { pos, t }) = index.decode(var) else {
            continue;
        };
        if let Some(prev) = trajectory[t].replace(pos) {
            log::warn!("malformed assignment: player on both {prev} and {pos} at step {t}");
            return None;
        }
    }

    trajectory
        .into_iter()
        .enumerate()
        .map(|(t, pos)| {
            if pos.is_none() {
                log::warn!("malformed assignment: no player position at step {t}");
            }
            pos
        })
        .collect()
}

/// Turns a satisfying assignment into the player's moves.
///
/// A step where the player stands still contributes no move, so the result
/// has at most `horizon` entries and may be empty.
///
/// # Returns
///
/// `None` if the assignment does not describe a single walk of unit steps;
/// the cause is logged at `warn`.
#[must_use]
pub fn decode_moves(index: &SokobanIndex, assignment: &Assignment) -> Option<Vec<Move>> {
    let trajectory = player_trajectory(index, assignment)?;

    let mut moves = Vec::with_capacity(index.horizon());
    for (t, pair) in trajectory.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let delta = (
            to.x().cast_signed() - from.x().cast_signed(),
            to.y().cast_signed() - from.y().cast_signed(),
        );
        if delta == (0, 0) {
            continue;
        }
        let Some(mv) = Move::from_delta(delta) else {
            log::warn!("malformed assignment: player jumps from {from} to {to} at step {t}");
            return None;
        };
        moves.push(mv);
    }

    Some(moves)
}
