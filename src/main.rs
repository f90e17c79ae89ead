//! # satpuzzles
//!
//! Command-line front-end for the `sat_puzzles` library: solves Sudoku
//! puzzles, plans Sokoban levels within a step bound, and decides raw DIMACS
//! formulas, all through the same external SAT solver.
//!
//! ## Usage
//!
//! ```sh
//! satpuzzles [GLOBAL_OPTIONS] [SUBCOMMAND]
//! ```
//!
//! A bare path solves one file by its extension (`.sudoku`, `.sokoban`,
//! `.cnf`), or every such file below a directory.
//!
//! ### Subcommands
//!
//! 1.  **`sudoku`**: `satpuzzles sudoku --path puzzle.sudoku [--export-dimacs]`
//! 2.  **`sokoban`**: `satpuzzles sokoban --path level.sokoban --horizon 12`
//! 3.  **`file`**: `satpuzzles file --path problem.cnf`
//! 4.  **`completions`**: `satpuzzles completions bash`
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Enable debug logging (default: `false`).
//! -   `-v, --verify <BOOL>`: Check answers against the rules (default: `true`).
//! -   `-s, --stats <BOOL>`: Print the statistics table (default: `true`).
//! -   `-p, --print-solution`: Print the raw model (default: `false`).
//!
//! Logging honours `RUST_LOG`; `--debug` lowers the default level to `debug`.

use clap::Parser;
use command_line::cli::{Cli, run};

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics table.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug() { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
