#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader for the DIMACS CNF file format.
//!
//! The format typically includes:
//! - Comment lines starting with 'c'.
//! - A problem line 'p cnf <`num_variables`> <`num_clauses`>'. The counts are
//!   not trusted; they are derived from the clauses actually read.
//! - Clause lines of whitespace-separated literals terminated by '0'.
//! - An optional '%' line marking end-of-data.
//!
//! Writing goes through the `Display` impl of [`Cnf`].

use crate::sat::cnf::{Clause, Cnf, Lit};
use std::io::{self, BufRead};
use std::path::Path;

/// Errors raised while reading DIMACS input.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DimacsError {
    /// The underlying reader failed.
    #[display("failed to read DIMACS input: {_0}")]
    Io(io::Error),
    /// A token on a clause line is not a literal: not an integer, or
    /// `i32::MIN`, which has no variable.
    #[display("line {line}: failed to parse literal '{token}' as i32")]
    #[from(ignore)]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        #[error(not(source))]
        token: String,
    },
}

/// Parses DIMACS formatted data from a `BufRead` source into a [`Cnf`].
///
/// Each non-comment line is one clause; the terminating `0` is dropped. A
/// line holding only `0` is skipped rather than read as an empty clause.
///
/// # Errors
///
/// [`DimacsError::Io`] if reading fails, [`DimacsError::InvalidLiteral`] on a
/// non-integer token or on `-2147483648`.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, DimacsError> {
    let mut cnf = Cnf::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => {
                let clause = parts
                    .map(|token| {
                        token
                            .parse::<Lit>()
                            .ok()
                            .filter(|&lit| lit != Lit::MIN)
                            .ok_or_else(|| DimacsError::InvalidLiteral {
                                line: idx + 1,
                                token: token.to_string(),
                            })
                    })
                    .filter(|lit| !matches!(lit, Ok(0)))
                    .collect::<Result<Clause, _>>()?;

                if !clause.is_empty() {
                    cnf.push(clause);
                }
            }
        }
    }

    Ok(cnf)
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// See [`parse_dimacs`]; opening the file may also fail with
/// [`DimacsError::Io`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, DimacsError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.len(), 2, "Should parse 2 clauses");
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.to_vecs(), vec![vec![1, -2], vec![2, 3]]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              c this should be ignored";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.to_vecs(), vec![vec![1], vec![-2]]);
    }

    #[test]
    fn test_parse_dimacs_zero_only_line() {
        let cnf = parse_dimacs(Cursor::new("p cnf 1 1\n0\n")).unwrap();
        assert!(cnf.is_empty());
    }

    #[test]
    fn test_parse_dimacs_malformed_literal() {
        let err = parse_dimacs(Cursor::new("1 0\n1 abc 0\n")).unwrap_err();
        assert!(matches!(err, DimacsError::InvalidLiteral { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2: failed to parse literal 'abc' as i32");
    }

    #[test]
    fn test_parse_dimacs_rejects_min_literal() {
        let err = parse_dimacs(Cursor::new("-2147483648 0\n")).unwrap_err();
        assert!(matches!(err, DimacsError::InvalidLiteral { line: 1, .. }));

        let cnf = parse_dimacs(Cursor::new("2147483647 -2147483647 0\n")).unwrap();
        assert_eq!(cnf.num_vars, 2_147_483_647);
    }

    #[test]
    fn test_display_is_readable_back() {
        let cnf = Cnf::new(vec![vec![4, -1], vec![2]]);
        let parsed = parse_dimacs(Cursor::new(cnf.to_string())).unwrap();
        assert_eq!(parsed, cnf);
    }
}
