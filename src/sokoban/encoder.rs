#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bounded-horizon Sokoban planning as CNF.
//!
//! The formula ranges over the fluents of a [`SokobanIndex`] for steps
//! `0..=T`. Each function below produces one family of clauses; [`encode`]
//! concatenates them. Models of the result correspond to plans of exactly
//! `T` steps, a step being either a single player move (possibly pushing one
//! box) or standing still, that leave every box on a goal.

use crate::sat::cnf::{Clause, Cnf, at_least_one, exactly_one, neg, pos};
use crate::sokoban::grid::{Grid, Move, Position};
use crate::sokoban::index::SokobanIndex;
use itertools::Itertools;

/// Builds the full planning formula for `grid` under `index`.
///
/// # Panics
///
/// Panics if `index` was not built for `grid`, since a cell or box outside
/// its blocks has no variable. [`Sokoban`](super::Sokoban) pairs the two at
/// construction, and its `to_cnf` is the only caller.
#[must_use]
pub(super) fn encode(grid: &Grid, index: &SokobanIndex) -> Cnf {
    Cnf::from_batches([
        initial_state(grid, index),
        wall_exclusion(grid, index),
        player_exactly_one(grid, index),
        box_exactly_one(grid, index),
        box_separation(grid, index),
        player_box_separation(grid, index),
        player_transitions(grid, index),
        box_transitions(grid, index),
        goal_condition(grid, index),
    ])
}

/// Unit clauses fixing the player and every box at their start cells at
/// step 0.
#[must_use]
pub(super) fn initial_state(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    std::iter::once(index.player_at(grid.player_start(), 0))
        .chain(grid.boxes().map(|(id, start)| index.box_at(id, start, 0)))
        .map(|var| Clause::from_slice(&[pos(var)]))
        .collect()
}

/// Nothing ever stands on a wall.
#[must_use]
pub(super) fn wall_exclusion(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let mut clauses = vec![];
    for t in 0..=index.horizon() {
        for wall in grid.wall_cells() {
            clauses.push(Clause::from_slice(&[neg(index.player_at(wall, t))]));
            for id in grid.box_ids() {
                clauses.push(Clause::from_slice(&[neg(index.box_at(id, wall, t))]));
            }
        }
    }
    clauses
}

/// The player occupies exactly one open cell at every step.
#[must_use]
pub(super) fn player_exactly_one(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let open = grid.open_cells().collect_vec();
    let mut clauses = vec![];
    for t in 0..=index.horizon() {
        let vars = open.iter().map(|&p| index.player_at(p, t)).collect_vec();
        clauses.extend(exactly_one(&vars));
    }
    clauses
}

/// Every box occupies exactly one open cell at every step.
#[must_use]
pub(super) fn box_exactly_one(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let open = grid.open_cells().collect_vec();
    let mut clauses = vec![];
    for id in grid.box_ids() {
        for t in 0..=index.horizon() {
            let vars = open.iter().map(|&p| index.box_at(id, p, t)).collect_vec();
            clauses.extend(exactly_one(&vars));
        }
    }
    clauses
}

/// No two boxes share a cell.
#[must_use]
pub(super) fn box_separation(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let mut clauses = vec![];
    for t in 0..=index.horizon() {
        for cell in grid.open_cells() {
            for (a, b) in grid.box_ids().tuple_combinations() {
                clauses.push(Clause::from_slice(&[
                    neg(index.box_at(a, cell, t)),
                    neg(index.box_at(b, cell, t)),
                ]));
            }
        }
    }
    clauses
}

/// The player never shares a cell with a box.
#[must_use]
pub(super) fn player_box_separation(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let mut clauses = vec![];
    for t in 0..=index.horizon() {
        for cell in grid.open_cells() {
            for id in grid.box_ids() {
                clauses.push(Clause::from_slice(&[
                    neg(index.player_at(cell, t)),
                    neg(index.box_at(id, cell, t)),
                ]));
            }
        }
    }
    clauses
}

fn open_neighbours(grid: &Grid, cell: Position) -> Vec<Position> {
    Move::ALL
        .into_iter()
        .filter_map(|mv| grid.open_step(cell, mv))
        .collect()
}

/// Between consecutive steps the player stays or moves to an adjacent open
/// cell.
///
/// On a dead-end cell the clause reduces to "stays".
#[must_use]
pub(super) fn player_transitions(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let mut clauses = vec![];
    for t in 0..index.horizon() {
        for cell in grid.open_cells() {
            let mut clause = Clause::from_slice(&[
                neg(index.player_at(cell, t)),
                pos(index.player_at(cell, t + 1)),
            ]);
            clause.extend(
                open_neighbours(grid, cell)
                    .into_iter()
                    .map(|n| pos(index.player_at(n, t + 1))),
            );
            clauses.push(clause);
        }
    }
    clauses
}

/// The push rule and the box frame axiom.
///
/// A box moves from `cell` to `dest` only if the player stood on the cell
/// behind it at `t` and steps onto `cell` at `t + 1`; a box with no open cell
/// behind it cannot move that way at all. Between steps each box stays or
/// moves to an adjacent open cell.
#[must_use]
pub(super) fn box_transitions(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let mut clauses = vec![];
    for id in grid.box_ids() {
        for t in 0..index.horizon() {
            for cell in grid.open_cells() {
                let here = neg(index.box_at(id, cell, t));
                let mut frame = Clause::from_slice(&[here, pos(index.box_at(id, cell, t + 1))]);

                for mv in Move::ALL {
                    let Some(dest) = grid.open_step(cell, mv) else {
                        continue;
                    };
                    let moved = neg(index.box_at(id, dest, t + 1));
                    match grid.open_step(cell, mv.opposite()) {
                        None => clauses.push(Clause::from_slice(&[here, moved])),
                        Some(behind) => {
                            clauses.push(Clause::from_slice(&[
                                here,
                                moved,
                                pos(index.player_at(behind, t)),
                            ]));
                            clauses.push(Clause::from_slice(&[
                                here,
                                moved,
                                pos(index.player_at(cell, t + 1)),
                            ]));
                        }
                    }
                    frame.push(pos(index.box_at(id, dest, t + 1)));
                }

                clauses.push(frame);
            }
        }
    }
    clauses
}

/// At the final step every box rests on some goal.
#[must_use]
pub(super) fn goal_condition(grid: &Grid, index: &SokobanIndex) -> Vec<Clause> {
    let horizon = index.horizon();
    grid.box_ids()
        .map(|id| {
            let vars = grid
                .goals()
                .iter()
                .map(|&g| index.box_at(id, g, horizon))
                .collect_vec();
            at_least_one(&vars)
        })
        .collect()
}
