use criterion::{Criterion, criterion_group, criterion_main};
use sat_puzzles::sat::oracle::{Oracle, SplrOracle};
use sat_puzzles::sokoban::{Grid, Sokoban};
use sat_puzzles::sudoku::solver::{Board, EXAMPLE_NINE, EXAMPLE_SIXTEEN, Sudoku};
use std::hint::black_box;
use std::time::Duration;

const LEVEL: &str = "\
#######
#P....#
#.B.B.#
#..#..#
#.G.G.#
#######";

fn bench_sudoku(c: &mut Criterion) {
    let nine = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
    let sixteen = Sudoku::new(Board::from(EXAMPLE_SIXTEEN)).unwrap();

    let mut group = c.benchmark_group("sudoku");
    group.sample_size(50);

    group.bench_function("9x9 - encode", |b| b.iter(|| black_box(nine.to_cnf())));

    group.bench_function("9x9 - encode and solve", |b| {
        b.iter(|| black_box(nine.solve().unwrap()));
    });

    let cnf = sixteen.to_cnf();
    group.bench_function("16x16 - oracle only", |b| {
        b.iter(|| black_box(SplrOracle.solve(&cnf).unwrap()));
    });

    group.bench_function("16x16 - encode and solve", |b| {
        b.iter(|| black_box(sixteen.solve().unwrap()));
    });

    group.finish();
}

fn bench_sokoban(c: &mut Criterion) {
    let grid: Grid = LEVEL.parse().unwrap();

    let mut group = c.benchmark_group("sokoban - horizon");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for horizon in [4, 8, 12, 16] {
        let sokoban = Sokoban::new(grid.clone(), horizon).unwrap();
        group.bench_function(format!("T = {horizon}"), |b| {
            b.iter(|| black_box(sokoban.solve().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sudoku, bench_sokoban);

criterion_main!(benches);
