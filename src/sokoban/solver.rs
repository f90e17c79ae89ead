#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A level and its horizon, solved through one oracle call.

use crate::sat::cnf::Cnf;
use crate::sat::oracle::{Oracle, SatResult, SplrOracle};
use crate::sokoban::SokobanError;
use crate::sokoban::decoder::decode_moves;
use crate::sokoban::encoder::encode;
use crate::sokoban::grid::{Grid, Move};
use crate::sokoban::index::SokobanIndex;
use std::fmt::Display;
use std::time::Instant;

/// A level paired with a planning horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sokoban {
    grid: Grid,
    index: SokobanIndex,
}

impl Sokoban {
    /// Fixes the variable layout for `grid` over `horizon` steps.
    ///
    /// # Errors
    ///
    /// [`SokobanError::TooLarge`] if the level and horizon need more
    /// variables than DIMACS can number.
    pub fn new(grid: Grid, horizon: usize) -> Result<Self, SokobanError> {
        let index = SokobanIndex::new(&grid, horizon).ok_or(SokobanError::TooLarge {
            rows: grid.rows(),
            cols: grid.cols(),
            boxes: grid.num_boxes(),
            horizon,
        })?;
        Ok(Self { grid, index })
    }

    /// The level.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The variable layout.
    #[must_use]
    pub const fn index(&self) -> &SokobanIndex {
        &self.index
    }

    /// The planning horizon `T`.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.index.horizon()
    }

    /// The planning formula.
    #[must_use]
    pub fn to_cnf(&self) -> Cnf {
        encode(&self.grid, &self.index)
    }

    /// Encodes, solves with `oracle` and decodes.
    ///
    /// # Returns
    ///
    /// `Ok(Some(moves))` with at most `horizon` moves, possibly none when the
    /// level starts solved, or `Ok(None)` if no plan of that length exists.
    ///
    /// # Errors
    ///
    /// [`SokobanError::Oracle`] if the oracle fails.
    pub fn solve_with<O: Oracle + ?Sized>(&self, oracle: &mut O) -> Result<Option<Vec<Move>>, SokobanError> {
        let time = Instant::now();
        let cnf = self.to_cnf();
        log::debug!(
            "encoded {}x{} sokoban with {} boxes over {} steps: {} variables, {} clauses in {:?}",
            self.grid.rows(),
            self.grid.cols(),
            self.grid.num_boxes(),
            self.horizon(),
            cnf.num_vars,
            cnf.len(),
            time.elapsed()
        );

        let time = Instant::now();
        let result = oracle.solve(&cnf)?;
        log::debug!("oracle returned in {:?}", time.elapsed());

        let plan = match result {
            SatResult::Satisfiable(assignment) => decode_moves(&self.index, &assignment),
            SatResult::Unsatisfiable => None,
        };
        match &plan {
            Some(moves) => log::info!("sokoban solved in {} moves", moves.len()),
            None => log::info!("sokoban has no plan within {} steps", self.horizon()),
        }
        Ok(plan)
    }

    /// Solves with the default oracle.
    ///
    /// # Errors
    ///
    /// See [`Sokoban::solve_with`].
    pub fn solve(&self) -> Result<Option<Vec<Move>>, SokobanError> {
        self.solve_with(&mut SplrOracle)
    }
}

impl Display for Sokoban {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::oracle::OracleError;
    use crate::sokoban::replay::replay;

    struct Refusing;

    impl Oracle for Refusing {
        fn solve(&mut self, _cnf: &Cnf) -> Result<SatResult, OracleError> {
            Err(OracleError::Solver {
                reason: "out of budget".to_string(),
            })
        }
    }

    struct Counting(usize);

    impl Oracle for Counting {
        fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, OracleError> {
            self.0 += 1;
            SplrOracle.solve(cnf)
        }
    }

    fn sokoban(level: &str, horizon: usize) -> Sokoban {
        Sokoban::new(level.parse().unwrap(), horizon).unwrap()
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let err = sokoban("PBG", 1).solve_with(&mut Refusing).unwrap_err();
        assert!(matches!(err, SokobanError::Oracle(_)));
    }

    #[test]
    fn test_single_oracle_call() {
        let mut oracle = Counting(0);
        let plan = sokoban("PBG", 1).solve_with(&mut oracle).unwrap();
        assert_eq!(plan, Some(vec![Move::Right]));
        assert_eq!(oracle.0, 1);
    }

    #[test]
    fn test_plan_replays_to_solved_state() {
        let s = sokoban("######\n#P...#\n#.BB.#\n#.GG.#\n######", 6);
        let plan = s.solve().unwrap().unwrap();
        assert!(plan.len() <= 6);
        assert!(replay(s.grid(), &plan).unwrap().is_solved());
    }

    #[test]
    fn test_short_horizon_fails() {
        let s = sokoban("######\n#P...#\n#.BB.#\n#.GG.#\n######", 3);
        assert_eq!(s.solve().unwrap(), None);
    }

    #[test]
    fn test_to_cnf_stays_within_index() {
        for horizon in 0..4 {
            let s = sokoban("######\n#P...#\n#.BB.#\n#.GG.#\n######", horizon);
            let cnf = s.to_cnf();
            let limit = s.index().num_vars();
            assert!(!cnf.is_empty());
            assert!(cnf.num_vars as usize <= limit);
            assert!(cnf.iter().flatten().all(|&lit| lit != 0));
        }
    }

    #[test]
    fn test_too_large_is_reported() {
        let grid: Grid = "PBG".parse().unwrap();
        let err = Sokoban::new(grid, usize::MAX).unwrap_err();
        assert!(matches!(err, SokobanError::TooLarge { .. }));
    }
}
