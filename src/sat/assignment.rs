#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Satisfying assignments returned by the oracle.

use crate::sat::cnf::{Lit, Var, var_of};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::Display;

/// The set of variables assigned `true` by a model. Every variable not in the
/// set is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(FxHashSet<Var>);

impl Assignment {
    /// Builds an assignment from a model given as signed literals, keeping
    /// the positive ones.
    #[must_use]
    pub fn from_model(model: &[Lit]) -> Self {
        Self(
            model
                .iter()
                .filter(|&&lit| lit > 0)
                .map(|&lit| var_of(lit))
                .collect(),
        )
    }

    /// Whether `var` is true.
    #[must_use]
    pub fn is_true(&self, var: Var) -> bool {
        self.0.contains(&var)
    }

    /// Number of true variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variable is true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The true variables in ascending order.
    ///
    /// Decoders walk this rather than the raw set so that their behaviour,
    /// including what they log, does not depend on hash order.
    pub fn true_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.0.iter().copied().sorted_unstable()
    }
}

impl FromIterator<Var> for Assignment {
    fn from_iter<T: IntoIterator<Item = Var>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.true_vars().join(" "))
    }
}
