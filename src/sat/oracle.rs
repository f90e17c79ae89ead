#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The SAT oracle seam.
//!
//! Encoders never search for models themselves: they hand a [`Cnf`] to an
//! [`Oracle`] and get back either a satisfying [`Assignment`] or an
//! unsatisfiable verdict. [`SplrOracle`] is the default implementation,
//! backed by the `splr` CDCL solver.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::{Cnf, Lit};
use splr::{Certificate, SolverError};

/// The verdict of one oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// The formula is satisfiable; the assignment satisfies every clause.
    Satisfiable(Assignment),
    /// The formula has no model.
    Unsatisfiable,
}

impl SatResult {
    /// The assignment, if satisfiable.
    #[must_use]
    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            Self::Satisfiable(a) => Some(a),
            Self::Unsatisfiable => None,
        }
    }

    /// Whether the verdict is satisfiable.
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        matches!(self, Self::Satisfiable(_))
    }
}

/// The oracle failed for a reason other than unsatisfiability.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum OracleError {
    /// The backing solver reported an internal failure.
    #[display("SAT solver failed: {reason}")]
    Solver {
        /// The solver's own description of the failure.
        #[error(not(source))]
        reason: String,
    },
}

/// Anything able to decide a CNF formula.
///
/// Implementations are used for exactly one call per solve; a fresh solver
/// instance is built inside `solve` and dropped before it returns.
pub trait Oracle {
    /// Decides `cnf`.
    ///
    /// # Errors
    ///
    /// [`OracleError`] if the solver fails. An unsatisfiable formula is not
    /// an error.
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, OracleError>;
}

/// The default oracle, delegating to the `splr` solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplrOracle;

impl Oracle for SplrOracle {
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, OracleError> {
        if cnf.has_empty_clause() {
            log::debug!("formula contains an empty clause");
            return Ok(SatResult::Unsatisfiable);
        }
        if cnf.is_empty() {
            return Ok(SatResult::Satisfiable(Assignment::default()));
        }
        if cnf.num_vars > Lit::MAX.unsigned_abs() {
            return Err(OracleError::Solver {
                reason: format!("variable {} does not fit a DIMACS literal", cnf.num_vars),
            });
        }

        log::debug!(
            "invoking splr: {} variables, {} clauses",
            cnf.num_vars,
            cnf.len()
        );

        match Certificate::try_from(cnf.to_vecs()) {
            Ok(Certificate::SAT(model)) => Ok(SatResult::Satisfiable(Assignment::from_model(&model))),
            Ok(Certificate::UNSAT) => Ok(SatResult::Unsatisfiable),
            // Conflicting unit clauses are detected while the clauses are
            // loaded, before any search.
            Err(
                SolverError::EmptyClause
                | SolverError::Inconsistent
                | SolverError::RootLevelConflict(..),
            ) => Ok(SatResult::Unsatisfiable),
            Err(e) => Err(OracleError::Solver {
                reason: format!("{e:?}"),
            }),
        }
    }
}

/// Decides `cnf` with the default oracle.
///
/// # Errors
///
/// See [`Oracle::solve`].
pub fn solve(cnf: &Cnf) -> Result<SatResult, OracleError> {
    SplrOracle.solve(cnf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sat() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 2], vec![1, -2]]);
        let result = solve(&cnf).unwrap();
        let assignment = result.into_assignment().unwrap();
        assert!(assignment.is_true(1));
        assert!(assignment.is_true(2));
        assert!(cnf.verify(&assignment));
    }

    #[test]
    fn test_unsat() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
        assert_eq!(solve(&cnf).unwrap(), SatResult::Unsatisfiable);
    }

    #[test]
    fn test_conflicting_units_unsat() {
        let cnf = Cnf::new(vec![vec![1], vec![-1]]);
        assert_eq!(solve(&cnf).unwrap(), SatResult::Unsatisfiable);
    }

    #[test]
    fn test_min_literal_is_an_error() {
        let cnf = Cnf::new(vec![vec![1], vec![i32::MIN]]);
        let err = solve(&cnf).unwrap_err();
        assert!(matches!(err, OracleError::Solver { .. }));
    }

    #[test]
    fn test_empty_clause_unsat() {
        let cnf = Cnf::new(vec![vec![1], vec![]]);
        assert_eq!(solve(&cnf).unwrap(), SatResult::Unsatisfiable);
    }

    #[test]
    fn test_empty_formula_sat() {
        let result = solve(&Cnf::default()).unwrap();
        assert_eq!(result, SatResult::Satisfiable(Assignment::default()));
    }
}
