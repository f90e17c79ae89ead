#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable numbering for the Sokoban fluents.
//!
//! Two contiguous blocks: player propositions over (t, x, y) starting at ID
//! 1, then box propositions over (box, t, x, y). Both are mixed-radix with
//! the level's real dimensions, so no two fluents share an ID for any level
//! shape and there are no padding cells to guard.

use crate::sat::cnf::Var;
use crate::sat::indexer::Packer;
use crate::sokoban::grid::{BoxId, Grid, Position};

/// A time-indexed proposition about the dynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fluent {
    /// The player stands on `pos` at step `t`.
    PlayerAt {
        /// The cell.
        pos: Position,
        /// The time step, `0..=horizon`.
        t: usize,
    },
    /// Box `id` rests on `pos` at step `t`.
    BoxAt {
        /// The box.
        id: BoxId,
        /// The cell.
        pos: Position,
        /// The time step, `0..=horizon`.
        t: usize,
    },
}

/// The bijection between fluents of one level and horizon and variable IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SokobanIndex {
    player: Packer<3>,
    boxes: Packer<4>,
    horizon: usize,
}

impl SokobanIndex {
    /// Builds the index for `grid` over steps `0..=horizon`.
    ///
    /// # Returns
    ///
    /// `None` if the fluents would not fit in the DIMACS variable range.
    #[must_use]
    pub fn new(grid: &Grid, horizon: usize) -> Option<Self> {
        let steps = horizon.checked_add(1)?;
        let player = Packer::new([steps, grid.rows(), grid.cols()], 1)?;
        let boxes = Packer::after(&player, [grid.num_boxes(), steps, grid.rows(), grid.cols()])?;
        Some(Self {
            player,
            boxes,
            horizon,
        })
    }

    /// The last time step.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// Total number of variables.
    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.player.len() + self.boxes.len()
    }

    /// The variable of a fluent, or `None` if its step, cell or box lies
    /// outside this index.
    #[must_use]
    pub fn encode(&self, fluent: Fluent) -> Option<Var> {
        match fluent {
            Fluent::PlayerAt { pos, t } => self.player.pack([t, pos.x(), pos.y()]),
            Fluent::BoxAt { id, pos, t } => self.boxes.pack([id.index(), t, pos.x(), pos.y()]),
        }
    }

    /// The fluent behind a variable, or `None` for an ID outside both blocks.
    #[must_use]
    pub fn decode(&self, var: Var) -> Option<Fluent> {
        if let Some([t, x, y]) = self.player.unpack(var) {
            return Some(Fluent::PlayerAt {
                pos: Position::new(x, y),
                t,
            });
        }
        self.boxes.unpack(var).map(|[b, t, x, y]| Fluent::BoxAt {
            id: BoxId::new(b),
            pos: Position::new(x, y),
            t,
        })
    }

    /// The variable of "player on `pos` at `t`".
    ///
    /// # Panics
    ///
    /// If `t` exceeds the horizon or `pos` comes from a larger grid.
    #[must_use]
    pub fn player_at(&self, pos: Position, t: usize) -> Var {
        self.encode(Fluent::PlayerAt { pos, t })
            .expect("player fluent within the indexed level and horizon")
    }

    /// The variable of "box `id` on `pos` at `t`".
    ///
    /// # Panics
    ///
    /// If `t` exceeds the horizon, `id` is not a box of the indexed level or
    /// `pos` comes from a larger grid.
    #[must_use]
    pub fn box_at(&self, id: BoxId, pos: Position, t: usize) -> Var {
        self.encode(Fluent::BoxAt { id, pos, t })
            .expect("box fluent within the indexed level and horizon")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rustc_hash::FxHashSet;

    fn level() -> Grid {
        "#####\n#PBG#\n#.BG#\n#####".parse().unwrap()
    }

    #[test]
    fn test_layout_counts() {
        let g = level();
        let index = SokobanIndex::new(&g, 3).unwrap();
        assert_eq!(index.num_vars(), 4 * 4 * 5 * (1 + 2));
        assert_eq!(index.player_at(Position::new(0, 0), 0), 1);
        assert_eq!(
            index.box_at(BoxId::new(0), Position::new(0, 0), 0),
            1 + 4 * 4 * 5
        );
    }

    #[test]
    fn test_ids_are_distinct_and_invertible() {
        let g = level();
        let horizon = 2;
        let index = SokobanIndex::new(&g, horizon).unwrap();

        let fluents = (0..=horizon)
            .cartesian_product(g.cells().collect_vec())
            .flat_map(|(t, pos)| {
                std::iter::once(Fluent::PlayerAt { pos, t })
                    .chain(g.box_ids().map(move |id| Fluent::BoxAt { id, pos, t }))
            })
            .collect_vec();

        let mut seen = FxHashSet::default();
        for fluent in fluents {
            let var = index.encode(fluent).unwrap();
            assert!(var >= 1);
            assert!(seen.insert(var), "{fluent:?} collides");
            assert_eq!(index.decode(var), Some(fluent));
        }
        assert_eq!(seen.len(), index.num_vars());
    }

    #[test]
    fn test_out_of_range_fluents_rejected() {
        let g = level();
        let index = SokobanIndex::new(&g, 1).unwrap();
        let outside = Position::new(g.rows(), g.cols());

        assert_eq!(index.encode(Fluent::PlayerAt { pos: outside, t: 0 }), None);
        assert_eq!(
            index.encode(Fluent::PlayerAt { pos: Position::new(0, 0), t: 2 }),
            None
        );
        assert_eq!(
            index.encode(Fluent::BoxAt {
                id: BoxId::new(2),
                pos: Position::new(0, 0),
                t: 0
            }),
            None
        );
        assert_eq!(index.decode(0), None);
        assert_eq!(index.decode(u32::try_from(index.num_vars()).unwrap() + 1), None);
    }

    #[test]
    fn test_no_boxes_gives_empty_box_block() {
        let g: Grid = "P.".parse().unwrap();
        let index = SokobanIndex::new(&g, 4).unwrap();
        assert_eq!(index.num_vars(), 5 * 2);
    }
}
