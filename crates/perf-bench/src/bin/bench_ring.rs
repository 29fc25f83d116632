use std::hint::black_box;
use std::time::Instant;

use perf_bench::*;
use ratio_solver_core::GraphCSR;
use ratio_solver_core::solver::HowardSolver;
use ratio_solver_core::traits::CycleRatioSolver;

fn main() {
    println!("--- Uniform Ring Benchmark ---");

    for &n in RING_SIZES.iter() {
        let mut edges = uniform_ring(n, 7, 2);
        let graph = GraphCSR::from_edges(n, &mut edges).expect("ring construction failed");

        let start_time = Instant::now();
        let solution = HowardSolver
            .min_cycle_ratio(&graph, f64::INFINITY)
            .expect("solver failed on ring");
        let elapsed_time = start_time.elapsed();

        let lambda = black_box(solution.lambda);

        // A uniform ring's ratio is exactly weight/transit; anything else
        // means the measurement is timing a broken run.
        assert!((lambda - 3.5).abs() < 1e-9);

        println!(
            "n = {:>7} | lambda = {:.4} | cycle len = {:>7} | {:?}",
            n,
            lambda,
            solution.cycle.len(),
            elapsed_time
        );
    }
}
