use std::hint::black_box;
use std::time::Instant;

use perf_bench::*;
use ratio_solver_core::GraphCSR;
use ratio_solver_core::solver::HowardSolver;
use ratio_solver_core::traits::CycleRatioSolver;

fn main() {
    println!(
        "--- Random SCC Benchmark ({} chords/node) ---",
        CHORDS_PER_NODE
    );

    for &n in RANDOM_SIZES.iter() {
        let mut edges = random_scc(n, SEED);
        let m = edges.len();

        let build_start = Instant::now();
        let graph = GraphCSR::from_edges(n, &mut edges).expect("graph construction failed");
        let build_time = build_start.elapsed();

        let solve_start = Instant::now();
        let solution = HowardSolver
            .min_cycle_ratio(&graph, f64::INFINITY)
            .expect("solver failed on random SCC");
        let solve_time = solve_start.elapsed();

        let lambda = black_box(solution.lambda);

        println!(
            "n = {:>7} m = {:>8} | lambda = {:>10.4} | build {:?} | solve {:?}",
            n, m, lambda, build_time, solve_time
        );
    }
}
