/// Argument parsing and the per-puzzle solve flows of the binary.
pub(crate) mod cli;
