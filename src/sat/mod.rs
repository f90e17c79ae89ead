#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Shared SAT plumbing: formulas, assignments, variable indexing and the
//! oracle seam. The puzzle encoders build on these and nothing here knows
//! about any particular puzzle.

/// Satisfying assignments as sets of true variables.
pub mod assignment;
/// CNF formulas, clauses and cardinality helpers.
pub mod cnf;
/// DIMACS CNF reading.
pub mod dimacs;
/// Mixed-radix variable indexing.
pub mod indexer;
/// The external SAT oracle.
pub mod oracle;
