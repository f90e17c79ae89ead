#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conjunctive Normal Form (CNF) formulas as handed to the SAT oracle.
//!
//! A formula is a conjunction of clauses; each clause is a disjunction of
//! literals. Literals follow the DIMACS convention: a positive integer `v` is
//! the variable `v`, and `-v` is its negation. `0` never appears in a clause.
//!
//! Encoders build a formula one rule at a time: every constraint family
//! returns its own clause batch and [`Cnf::from_batches`] concatenates them.

use crate::sat::assignment::Assignment;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

/// A propositional variable identifier. Always strictly positive.
pub type Var = u32;

/// A signed literal in DIMACS convention.
pub type Lit = i32;

/// A clause: a disjunction of literals.
///
/// Most clauses produced by the puzzle encoders are binary exclusions, so
/// they live inline without a heap allocation.
pub type Clause = SmallVec<[Lit; 4]>;

/// Returns the positive literal of `var`.
///
/// # Panics
///
/// If `var` does not fit in an `i32`. Variable IDs are produced by the
/// indexers, which never allocate beyond `i32::MAX`.
#[must_use]
pub fn pos(var: Var) -> Lit {
    Lit::try_from(var).expect("variable id exceeds i32::MAX")
}

/// Returns the negative literal of `var`.
///
/// # Panics
///
/// See [`pos`].
#[must_use]
pub fn neg(var: Var) -> Lit {
    -pos(var)
}

/// Returns the variable underlying a literal.
#[must_use]
pub const fn var_of(lit: Lit) -> Var {
    lit.unsigned_abs()
}

/// Pairwise exclusion: for every unordered pair of `vars`, a clause
/// forbidding both from being true together.
///
/// Together with [`at_least_one`] this is the exactly-one encoding used by
/// every puzzle rule in this crate.
pub fn at_most_one(vars: &[Var]) -> impl Iterator<Item = Clause> + '_ {
    vars.iter()
        .tuple_combinations()
        .map(|(&a, &b)| Clause::from_slice(&[neg(a), neg(b)]))
}

/// A single clause requiring at least one of `vars` to be true.
#[must_use]
pub fn at_least_one(vars: &[Var]) -> Clause {
    vars.iter().copied().map(pos).collect()
}

/// Exactly one of `vars` is true: one at-least-one clause followed by the
/// pairwise exclusions.
pub fn exactly_one(vars: &[Var]) -> impl Iterator<Item = Clause> + '_ {
    std::iter::once(at_least_one(vars)).chain(at_most_one(vars))
}

/// A CNF formula.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// The clauses in emission order.
    pub clauses: Vec<Clause>,

    /// The largest variable ID mentioned by any clause (0 when empty).
    pub num_vars: Var,
}

impl Cnf {
    /// Creates a formula from any collection of clauses.
    ///
    /// # Arguments
    ///
    /// * `clauses` - An iterator of clauses, each an iterator of DIMACS
    ///   literals.
    pub fn new<I, J>(clauses: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = Lit>,
    {
        let mut cnf = Self::default();
        for clause in clauses {
            cnf.push(clause.into_iter().collect());
        }
        cnf
    }

    /// Concatenates independently built clause batches into one formula,
    /// preserving the order of the batches and of the clauses within them.
    pub fn from_batches<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<Clause>>,
    {
        let mut cnf = Self::default();
        for batch in batches {
            cnf.extend(batch);
        }
        cnf
    }

    /// Appends a clause, updating [`Cnf::num_vars`].
    pub fn push(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|&l| var_of(l)).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether the formula has no clauses (and is therefore trivially
    /// satisfiable).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of literal occurrences across all clauses.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(SmallVec::len).sum()
    }

    /// Whether some clause is empty. Such a formula is unsatisfiable.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(SmallVec::is_empty)
    }

    /// Iterates over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Checks that `assignment` satisfies every clause.
    ///
    /// A variable absent from the assignment counts as false.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let value = assignment.is_true(var_of(lit));
                if lit > 0 { value } else { !value }
            })
        })
    }

    /// The clauses as plain vectors, the shape the external oracle consumes.
    #[must_use]
    pub fn to_vecs(&self) -> Vec<Vec<Lit>> {
        self.clauses.iter().map(|c| c.to_vec()).collect()
    }
}

impl Extend<Clause> for Cnf {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        for clause in iter {
            self.push(clause);
        }
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let mut cnf = Self::default();
        cnf.extend(iter);
        cnf
    }
}

/// Formats the formula in DIMACS CNF.
impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{} 0", clause.iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracks_num_vars() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![3, -7]]);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars, 7);
        assert_eq!(cnf.num_literals(), 4);
    }

    #[test]
    fn test_exactly_one_clause_shape() {
        let clauses: Vec<Clause> = exactly_one(&[1, 2, 3]).collect();
        assert_eq!(clauses.len(), 1 + 3);
        assert_eq!(clauses[0].as_slice(), &[1, 2, 3]);
        assert!(clauses[1..].iter().all(|c| c.len() == 2 && c.iter().all(|&l| l < 0)));
    }

    #[test]
    fn test_at_most_one_single_var_is_empty() {
        assert_eq!(at_most_one(&[5]).count(), 0);
    }

    #[test]
    fn test_from_batches_preserves_order() {
        let a = vec![Clause::from_slice(&[1])];
        let b = vec![Clause::from_slice(&[-2, 3]), Clause::from_slice(&[4])];
        let cnf = Cnf::from_batches([a, b]);
        assert_eq!(cnf.to_vecs(), vec![vec![1], vec![-2, 3], vec![4]]);
        assert_eq!(cnf.num_vars, 4);
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 3]]);
        assert!(cnf.verify(&Assignment::from_model(&[1, -2, 3])));
        assert!(!cnf.verify(&Assignment::from_model(&[1, -2, -3])));
        assert!(cnf.verify(&Assignment::from_model(&[-1, 2, -3])));
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![2]]);
        assert_eq!(cnf.to_string(), "p cnf 2 2\n1 -2 0\n2 0\n");
    }

    #[test]
    fn test_has_empty_clause() {
        let mut cnf = Cnf::new(vec![vec![1]]);
        assert!(!cnf.has_empty_clause());
        cnf.push(Clause::new());
        assert!(cnf.has_empty_clause());
    }
}
