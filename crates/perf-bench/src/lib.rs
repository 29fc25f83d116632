use common::types::Edge;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const RING_SIZES: [usize; 4] = [1_000, 10_000, 100_000, 500_000];
pub const RANDOM_SIZES: [usize; 3] = [1_000, 10_000, 100_000];
pub const CHORDS_PER_NODE: usize = 4;
pub const SEED: u64 = 0xC1C1E;

pub const MAX_WEIGHT: i64 = 1_000;
pub const MAX_TRANSIT: i64 = 16;

/// Generates a uniform Hamiltonian ring: every edge has the same weight and
/// transit time, so the minimum cycle ratio is known in closed form and the
/// solver's answer can be sanity-checked alongside the timing.
pub fn uniform_ring(num_nodes: usize, weight: i64, transit: i64) -> Vec<Edge> {
    (0..num_nodes)
        .map(|i| (i, (i + 1) % num_nodes, weight, transit))
        .collect()
}

/// Generates a strongly connected graph: a Hamiltonian ring with random
/// attributes plus `CHORDS_PER_NODE` random chords per node. Transit times
/// are kept positive so every cycle ratio is defined.
pub fn random_scc(num_nodes: usize, seed: u64) -> Vec<Edge> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges: Vec<Edge> = (0..num_nodes)
        .map(|i| {
            (
                i,
                (i + 1) % num_nodes,
                rng.random_range(-MAX_WEIGHT..MAX_WEIGHT),
                rng.random_range(1..MAX_TRANSIT),
            )
        })
        .collect();

    for _ in 0..num_nodes * CHORDS_PER_NODE {
        edges.push((
            rng.random_range(0..num_nodes),
            rng.random_range(0..num_nodes),
            rng.random_range(-MAX_WEIGHT..MAX_WEIGHT),
            rng.random_range(1..MAX_TRANSIT),
        ));
    }

    edges
}
