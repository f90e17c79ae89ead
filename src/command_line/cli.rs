#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use sat_puzzles::error::{Error, Result};
use sat_puzzles::sat::assignment::Assignment;
use sat_puzzles::sat::cnf::{Cnf, Var};
use sat_puzzles::sat::dimacs::parse_file;
use sat_puzzles::sat::oracle::{Oracle, OracleError, SatResult, SplrOracle};
use sat_puzzles::sokoban::replay::replay;
use sat_puzzles::sokoban::{Move, Sokoban, parse_sokoban_file};
use sat_puzzles::sudoku::solver::parse_sudoku_file;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Horizon used when a Sokoban level is solved without an explicit
/// `--horizon`, e.g. from a bare path or a directory walk.
pub(crate) const DEFAULT_HORIZON: usize = 20;

/// Defines the command-line interface.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "satpuzzles", version, about = "Solve Sudoku and Sokoban by reduction to SAT")]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// a `.sudoku`, `.sokoban` or `.cnf` file is solved according to its
    /// extension, and a directory is walked for such files.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `sudoku`, `sokoban`, `file`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

impl Cli {
    /// Whether debug output was requested, at the top level or on the
    /// subcommand.
    pub(crate) fn debug(&self) -> bool {
        self.common.debug
            || match &self.command {
                Some(
                    Commands::File { common, .. }
                    | Commands::Sudoku { common, .. }
                    | Commands::Sokoban { common, .. },
                ) => common.debug,
                Some(Commands::Completions { .. }) | None => false,
            }
    }
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle.
    /// The puzzle is converted into a CNF formula, which is then solved.
    Sudoku {
        /// Path to the Sudoku file: one row per line, `0` or `.` for blanks.
        #[arg(long)]
        path: PathBuf,

        /// Write the generated CNF in DIMACS format next to the puzzle, as
        /// `<path>.cnf`.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Plan a Sokoban solution within a bounded number of steps.
    Sokoban {
        /// Path to the level file, one row per line.
        #[arg(long)]
        path: PathBuf,

        /// Number of time steps to plan over.
        #[arg(short = 't', long, default_value_t = DEFAULT_HORIZON)]
        horizon: usize,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the answer against the puzzle rules, or a model against its formula.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Enable printing of problem statistics after solving.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Enable printing of the satisfying assignment (model) if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

/// Executes the parsed command line.
///
/// # Errors
///
/// Any parse, solver or verification failure.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::File { path, common }) => solve_cnf_file(&path, &common),
        Some(Commands::Sudoku {
            path,
            export_dimacs,
            common,
        }) => solve_sudoku_file(&path, export_dimacs, &common),
        Some(Commands::Sokoban {
            path,
            horizon,
            common,
        }) => solve_sokoban_file(&path, horizon, &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => match cli.path {
            Some(path) if path.is_dir() => solve_dir(&path, &cli.common),
            Some(path) => solve_path(&path, &cli.common),
            None => {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        },
    }
}

/// Solves a single file, choosing the puzzle by its extension.
///
/// # Errors
///
/// [`Error::UnknownInput`] for an unrecognised extension, otherwise see the
/// per-puzzle functions.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("sudoku") => solve_sudoku_file(path, false, common),
        Some("sokoban") => solve_sokoban_file(path, DEFAULT_HORIZON, common),
        Some("cnf") => solve_cnf_file(path, common),
        _ => Err(Error::UnknownInput {
            path: path.to_path_buf(),
        }),
    }
}

/// Solves every recognised file below a directory.
///
/// Files with other extensions are skipped.
///
/// # Errors
///
/// The first failure stops the walk.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<()> {
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        match solve_path(file_path, common) {
            Err(Error::UnknownInput { path }) => {
                log::info!("skipping {}", path.display());
            }
            other => other?,
        }
    }

    Ok(())
}

/// The default oracle, recording what it was asked and how long it took.
#[derive(Debug, Default)]
pub(crate) struct RecordingOracle {
    pub(crate) solve_time: Duration,
    pub(crate) num_vars: Var,
    pub(crate) num_clauses: usize,
    pub(crate) num_literals: usize,
    pub(crate) model: Option<Assignment>,
}

impl Oracle for RecordingOracle {
    fn solve(&mut self, cnf: &Cnf) -> std::result::Result<SatResult, OracleError> {
        self.num_vars = cnf.num_vars;
        self.num_clauses = cnf.len();
        self.num_literals = cnf.num_literals();

        let time = Instant::now();
        let result = SplrOracle.solve(cnf);
        self.solve_time = time.elapsed();

        if let Ok(SatResult::Satisfiable(assignment)) = &result {
            self.model = Some(assignment.clone());
        }
        result
    }
}

/// Solves a DIMACS file.
///
/// # Errors
///
/// If the file cannot be parsed, the oracle fails or, with `--verify`, the
/// model does not satisfy the formula.
pub(crate) fn solve_cnf_file(path: &Path, common: &CommonOptions) -> Result<()> {
    println!("Solving: {}", path.display());

    let time = Instant::now();
    let cnf = parse_file(path)?;
    let parse_time = time.elapsed();
    log::debug!("parsed {} clauses over {} variables", cnf.len(), cnf.num_vars);

    let mut oracle = RecordingOracle::default();
    let satisfiable = oracle.solve(&cnf)?.is_sat();

    if common.verify {
        if let Some(model) = &oracle.model {
            let ok = cnf.verify(model);
            println!("Verified: {ok:?}");
            if !ok {
                return Err(Error::Verification {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    report(parse_time, &oracle, common);
    println!("\n{}", if satisfiable { "SATISFIABLE" } else { "UNSATISFIABLE" });
    Ok(())
}

/// Solves a Sudoku file.
///
/// # Errors
///
/// If the file cannot be read or parsed, the DIMACS export cannot be
/// written, the oracle fails or, with `--verify`, the decoded board breaks
/// the rules.
pub(crate) fn solve_sudoku_file(
    path: &Path,
    export_dimacs: bool,
    common: &CommonOptions,
) -> Result<()> {
    println!("Solving: {}", path.display());

    let time = Instant::now();
    let sudoku = parse_sudoku_file(path)?;
    let parse_time = time.elapsed();
    println!("Parsed Sudoku:\n{sudoku}");

    if export_dimacs {
        let dimacs_path = PathBuf::from(format!("{}.cnf", path.display()));
        std::fs::write(&dimacs_path, sudoku.to_cnf().to_string())?;
        println!("DIMACS written to: {}", dimacs_path.display());
    }

    let mut oracle = RecordingOracle::default();
    let solution = sudoku.solve_with(&mut oracle)?;

    if common.verify {
        if let Some(board) = &solution {
            let ok = board.is_solution_of(&sudoku.board);
            println!("Verified: {ok:?}");
            if !ok {
                return Err(Error::Verification {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    report(parse_time, &oracle, common);
    match solution {
        Some(board) => println!("Solution:\n{board}"),
        None => println!("No solution found"),
    }
    Ok(())
}

/// Plans a Sokoban level from a file.
///
/// # Errors
///
/// If the file cannot be read or parsed, the oracle fails or, with
/// `--verify`, the plan does not replay to a solved state.
pub(crate) fn solve_sokoban_file(path: &Path, horizon: usize, common: &CommonOptions) -> Result<()> {
    println!("Solving: {} (horizon {horizon})", path.display());

    let time = Instant::now();
    let sokoban = Sokoban::new(parse_sokoban_file(path)?, horizon)?;
    let parse_time = time.elapsed();
    println!("Parsed Sokoban:\n{sokoban}");

    let mut oracle = RecordingOracle::default();
    let plan = sokoban.solve_with(&mut oracle)?;

    if common.verify {
        if let Some(moves) = &plan {
            let end = replay(sokoban.grid(), moves)?;
            println!("Verified: {:?}", end.is_solved());
            if !end.is_solved() {
                return Err(Error::Verification {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    report(parse_time, &oracle, common);
    match plan {
        Some(moves) => println!("Plan ({} moves): {}", moves.len(), format_moves(&moves)),
        None => println!("No plan within {horizon} steps"),
    }
    Ok(())
}

/// Renders moves as a string of `U`/`D`/`L`/`R`.
pub(crate) fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(|m| m.symbol()).collect()
}

/// Allocated and resident memory in MiB, if jemalloc reports them.
fn memory_mib() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Prints the statistics table and, if requested, the raw model.
fn report(parse_time: Duration, oracle: &RecordingOracle, common: &CommonOptions) {
    if common.stats {
        print_stats(parse_time, oracle);
    }
    if common.print_solution {
        if let Some(model) = &oracle.model {
            println!("Model: {model}");
        }
    }
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of problem statistics.
pub(crate) fn print_stats(parse_time: Duration, oracle: &RecordingOracle) {
    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", oracle.num_vars);
    stat_line("Clauses", oracle.num_clauses);
    stat_line("Literals", oracle.num_literals);

    println!("========================[ Search Statistics ]========================");
    stat_line("Solve time (s)", format!("{:.3}", oracle.solve_time.as_secs_f64()));
    match memory_mib() {
        Some((allocated, resident)) => {
            stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
            stat_line("Resident memory (MiB)", format!("{resident:.2}"));
        }
        None => stat_line("Memory usage (MiB)", "n/a"),
    }
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sokoban_subcommand() {
        let cli = Cli::try_parse_from([
            "satpuzzles",
            "sokoban",
            "--path",
            "level.sokoban",
            "--horizon",
            "7",
            "--debug",
        ])
        .unwrap();
        assert!(cli.debug());
        match cli.command {
            Some(Commands::Sokoban { path, horizon, common }) => {
                assert_eq!(path, PathBuf::from("level.sokoban"));
                assert_eq!(horizon, 7);
                assert!(common.verify);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verify_can_be_disabled() {
        let cli = Cli::try_parse_from(["satpuzzles", "--verify", "false", "puzzle.sudoku"]).unwrap();
        assert!(!cli.common.verify);
        assert!(cli.common.stats);
        assert_eq!(cli.path, Some(PathBuf::from("puzzle.sudoku")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = solve_path(Path::new("notes.txt"), &CommonOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownInput { .. }));
    }

    #[test]
    fn test_recording_oracle_keeps_model() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1]]);
        let mut oracle = RecordingOracle::default();
        assert!(oracle.solve(&cnf).unwrap().is_sat());
        assert_eq!(oracle.num_clauses, 2);
        assert_eq!(oracle.num_literals, 3);
        let model = oracle.model.unwrap();
        assert!(model.is_true(2));
        assert!(!model.is_true(1));
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&[Move::Up, Move::Right, Move::Down, Move::Left]), "URDL");
        assert_eq!(format_moves(&[]), "");
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
