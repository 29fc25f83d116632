use common::{
    error::Error,
    numeric_kernel::{reduced_cost, strictly_improves},
    types::RatioSolution,
};
use tracing::{debug, trace};

use super::queue::BoundedQueue;
use super::traits::{CycleRatioSolver, NodeQueue, RatioGraph};

/// Sentinel for a node whose policy edge has not been chosen yet. Never
/// survives past the initial policy build; `build_initial_policy` fails fast
/// on any node still carrying it.
const NO_EDGE: usize = usize::MAX;

/// Per-node working record, one per node, alive for one solver call.
///
/// The policy edge's target, weight, and transit time are cached here so the
/// inner loops never go back to the edge list. The reference design overloads
/// one `visited` integer with two meanings (cycle-search stamp vs. binary
/// relaxation flag); those are kept as two separate fields, `stamp` and
/// `relaxed`.
#[derive(Debug, Clone)]
struct NodeRecord {
    potential: f64,
    policy_edge: usize,
    policy_target: usize,
    policy_weight: i64,
    policy_transit: i64,
    stamp: Option<usize>,
    relaxed: bool,
}

/// Solver implementing Howard's policy-iteration algorithm for the minimum
/// cycle ratio of a single strongly connected component.
///
/// Each node selects one outgoing edge (its policy), which makes the policy
/// graph a total function with exactly one cycle per weakly connected
/// component. The loop alternates between scoring the policy cycles, pushing
/// the best ratio's effect backwards through the policy tree, and relaxing
/// every graph edge against the current ratio estimate until no edge improves.
pub struct HowardSolver;

impl HowardSolver {
    /// Selects the locally cheapest outgoing edge of every node as its
    /// initial policy, leaving the node's potential at that edge's weight.
    ///
    /// # Errors
    /// Returns `Error::MissingOutgoingEdge` for the first node with
    /// out-degree zero; such a node can never carry a policy edge.
    fn build_initial_policy<G: RatioGraph>(graph: &G) -> Result<Vec<NodeRecord>, Error> {
        let n = graph.node_count();
        let m = graph.edge_count();

        let mut records = vec![
            NodeRecord {
                potential: f64::INFINITY,
                policy_edge: NO_EDGE,
                policy_target: 0,
                policy_weight: 0,
                policy_transit: 0,
                stamp: None,
                relaxed: false,
            };
            n
        ];

        for e in 0..m {
            let u = graph.edge_source(e);
            let weight = graph.edge_weight(e);

            if (weight as f64) < records[u].potential {
                records[u].potential = weight as f64;
                records[u].policy_edge = e;
                records[u].policy_target = graph.edge_target(e);
                records[u].policy_weight = weight;
                records[u].policy_transit = graph.edge_transit(e);
            }
        }

        if let Some(v) = records.iter().position(|r| r.policy_edge == NO_EDGE) {
            return Err(Error::MissingOutgoingEdge(v));
        }

        Ok(records)
    }

    /// Finds the minimum-ratio cycle among the cycles of the current policy
    /// graph. Every weakly connected component of a functional graph contains
    /// exactly one cycle, so one forward walk per unstamped node covers them
    /// all.
    ///
    /// Updates `lambda` in place and returns a node on the improving cycle
    /// together with the cycle's vertices, or `None` if no policy cycle beats
    /// the current `lambda`. When several cycles improve within one pass, the
    /// last one reached in node-index order wins; among equal-ratio cycles
    /// the choice is arbitrary.
    fn detect_min_cycle(
        records: &mut [NodeRecord],
        lambda: &mut f64,
    ) -> Result<Option<(usize, Vec<usize>)>, Error> {
        for record in records.iter_mut() {
            record.stamp = None;
        }

        let mut best: Option<(usize, Vec<usize>)> = None;

        for v in 0..records.len() {
            if records[v].stamp.is_some() {
                continue;
            }

            // Walk forward along policy edges, stamping with the origin id,
            // until reaching an already-stamped node.
            let mut u = v;
            loop {
                records[u].stamp = Some(v);
                u = records[u].policy_target;
                if records[u].stamp.is_some() {
                    break;
                }
            }

            if records[u].stamp != Some(v) {
                // Merged into a branch explored by an earlier origin; the
                // cycle down that path has already been scored.
                continue;
            }

            // u closed a fresh cycle. Accumulate its weight and transit time.
            let head = u;
            let mut cycle = Vec::new();
            let mut total_weight: i64 = 0;
            let mut total_transit: i64 = 0;
            loop {
                cycle.push(u);
                total_weight += records[u].policy_weight;
                total_transit += records[u].policy_transit;
                u = records[u].policy_target;
                if u == head {
                    break;
                }
            }

            if total_transit == 0 {
                return Err(Error::ZeroTransitCycle(head));
            }

            let ratio = total_weight as f64 / total_transit as f64;
            if ratio < *lambda {
                *lambda = ratio;
                best = Some((head, cycle));
            }
        }

        Ok(best)
    }

    /// Reverse breadth-first update of node potentials, starting from a node
    /// on the newly found best cycle and flowing backwards along the current
    /// policy tree. Only predecessors whose policy edge points at an
    /// already-updated node are touched; nodes outside the tree keep their
    /// potentials until the global relaxation pass reaches them.
    fn propagate_potentials<G: RatioGraph>(
        graph: &G,
        records: &mut [NodeRecord],
        best_node: usize,
        lambda: f64,
        queue: &mut BoundedQueue,
    ) {
        for record in records.iter_mut() {
            record.relaxed = false;
        }

        queue.reset();
        queue.push(best_node);
        records[best_node].relaxed = true;

        while let Some(v) = queue.pop() {
            for i in 0..graph.in_degree(v) {
                let u = graph.predecessor_edge_source(v, i);

                if !records[u].relaxed && records[u].policy_target == v {
                    records[u].relaxed = true;
                    records[u].potential = reduced_cost(
                        records[v].potential,
                        records[u].policy_weight,
                        records[u].policy_transit,
                        lambda,
                    );
                    queue.push(u);
                }
            }
        }
    }

    /// Scans every edge of the graph and adopts any edge whose reduced cost
    /// improves its source's potential beyond the epsilon tolerance. Returns
    /// whether at least one edge was adopted.
    fn relax_all_edges<G: RatioGraph>(
        graph: &G,
        records: &mut [NodeRecord],
        lambda: f64,
    ) -> bool {
        let mut improved = false;

        for e in 0..graph.edge_count() {
            let u = graph.edge_source(e);
            let v = graph.edge_target(e);
            let weight = graph.edge_weight(e);
            let transit = graph.edge_transit(e);

            let candidate = reduced_cost(records[v].potential, weight, transit, lambda);

            if strictly_improves(records[u].potential, candidate) {
                improved = true;
                records[u].potential = candidate;
                records[u].policy_edge = e;
                records[u].policy_target = v;
                records[u].policy_weight = weight;
                records[u].policy_transit = transit;
            }
        }

        improved
    }
}

impl CycleRatioSolver for HowardSolver {
    /// Computes the minimum cycle ratio of `graph` (sum of cycle weights over
    /// sum of cycle transit times), never exceeding `lambda_so_far`.
    ///
    /// The loop terminates when a full relaxation pass adopts no edge (the
    /// policy graph already encodes optimal potentials for the current
    /// lambda), or after `node_count` consecutive passes without a lambda
    /// improvement.
    ///
    /// # Errors
    /// - `Error::EmptyGraph` for a zero-node input.
    /// - `Error::MissingOutgoingEdge` if some node has out-degree zero.
    /// - `Error::ZeroTransitCycle` if a policy cycle's transit times sum to
    ///   zero, which would make its ratio undefined.
    fn min_cycle_ratio<G: RatioGraph>(
        &self,
        graph: &G,
        lambda_so_far: f64,
    ) -> Result<RatioSolution, Error> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }

        let mut records = Self::build_initial_policy(graph)?;
        let mut queue = BoundedQueue::with_capacity(n);

        let mut lambda = lambda_so_far;
        let mut best_cycle: Vec<usize> = Vec::new();

        let stagnation_limit = n;
        let mut stagnation_count = 0;

        loop {
            match Self::detect_min_cycle(&mut records, &mut lambda)? {
                Some((best_node, cycle)) => {
                    stagnation_count = 0;
                    debug!(lambda, best_node, "policy cycle improved lambda");
                    best_cycle = cycle;
                    Self::propagate_potentials(graph, &mut records, best_node, lambda, &mut queue);
                }
                None => {
                    stagnation_count += 1;
                    if stagnation_count > stagnation_limit {
                        trace!(stagnation_count, "stagnation limit reached");
                        break;
                    }
                }
            }

            if !Self::relax_all_edges(graph, &mut records, lambda) {
                trace!("no edge relaxation possible; converged");
                break;
            }
        }

        Ok(RatioSolution {
            lambda,
            cycle: best_cycle,
            potentials: records.iter().map(|r| r.potential).collect(),
            policy: records.iter().map(|r| r.policy_edge).collect(),
        })
    }
}

#[cfg(test)]
mod howard_tests {
    use super::*;
    use crate::csr::GraphCSR;
    use common::numeric_kernel::EPSILON;
    use common::types::Edge;

    fn build_graph(edges: &mut [Edge], num_nodes: usize) -> GraphCSR {
        GraphCSR::from_edges(num_nodes, edges).unwrap()
    }

    fn solve(graph: &GraphCSR, lambda_so_far: f64) -> RatioSolution {
        HowardSolver.min_cycle_ratio(graph, lambda_so_far).unwrap()
    }

    fn assert_ratio_eq(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "ratio {} does not match expected {}",
            actual,
            expected
        );
    }

    /// Post-condition of a converged relaxation pass: no edge can still
    /// improve its source's potential.
    fn assert_reduced_cost_consistent(graph: &GraphCSR, solution: &RatioSolution) {
        for e in 0..graph.edge_count() {
            let u = graph.edge_source(e);
            let v = graph.edge_target(e);
            let candidate = reduced_cost(
                solution.potentials[v],
                graph.edge_weight(e),
                graph.edge_transit(e),
                solution.lambda,
            );
            assert!(
                solution.potentials[u] <= candidate + EPSILON + 1e-9,
                "edge {} ({} -> {}) still improves potential {} to {}",
                e,
                u,
                v,
                solution.potentials[u],
                candidate
            );
        }
    }

    #[test]
    fn single_self_loop_returns_weight_over_transit() {
        let mut edges = vec![(0, 0, 6, 2)];
        let graph = build_graph(&mut edges, 1);

        let solution = solve(&graph, f64::INFINITY);

        assert_ratio_eq(solution.lambda, 3.0);
        assert_eq!(solution.cycle, vec![0]);
        assert_reduced_cost_consistent(&graph, &solution);
    }

    #[test]
    fn negative_weight_self_loop() {
        let mut edges = vec![(0, 0, -4, 2)];
        let graph = build_graph(&mut edges, 1);

        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, -2.0);
    }

    #[test]
    fn uniform_cycle_ratio_independent_of_length() {
        for k in [2usize, 3, 5, 8] {
            let mut edges: Vec<Edge> = (0..k).map(|i| (i, (i + 1) % k, 3, 2)).collect();
            let graph = build_graph(&mut edges, k);

            let solution = solve(&graph, f64::INFINITY);

            assert_ratio_eq(solution.lambda, 1.5);
            assert_eq!(solution.cycle.len(), k);
            assert_reduced_cost_consistent(&graph, &solution);
        }
    }

    #[test]
    fn cycle_with_mixed_weights_uses_sums() {
        // 0 -> 1 -> 2 -> 0: weights 1, 4, 7 and transits 2, 3, 1.
        // Ratio = 12 / 6 = 2.
        let mut edges = vec![(0, 1, 1, 2), (1, 2, 4, 3), (2, 0, 7, 1)];
        let graph = build_graph(&mut edges, 3);

        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, 2.0);
    }

    #[test]
    fn chord_creating_cheaper_cycle_wins() {
        // Ring 0 -> 1 -> 2 -> 0 has ratio 9/3 = 3. The chord 1 -> 0 closes
        // the cycle 0 -> 1 -> 0 with ratio (3 + 1) / 2 = 2.
        let mut edges = vec![(0, 1, 3, 1), (1, 2, 3, 1), (2, 0, 3, 1), (1, 0, 1, 1)];
        let graph = build_graph(&mut edges, 3);

        let solution = solve(&graph, f64::INFINITY);

        assert_ratio_eq(solution.lambda, 2.0);
        assert_reduced_cost_consistent(&graph, &solution);
    }

    /// Graph layout shared by the competing-cycle tests: cycle A over
    /// {0, 1}, cycle B over {2, 3}, one-way bridge 1 -> 2 between them.
    fn competing_cycles(
        a_weight: i64,
        b_weight: i64,
        bridge_weight: i64,
    ) -> (GraphCSR, f64) {
        let mut edges = vec![
            (0, 1, a_weight, 1),
            (1, 0, a_weight, 1),
            (2, 3, b_weight, 1),
            (3, 2, b_weight, 1),
            (1, 2, bridge_weight, 1),
        ];
        let graph = build_graph(&mut edges, 4);
        let expected = (a_weight.min(b_weight)) as f64;
        (graph, expected)
    }

    #[test]
    fn two_competing_cycles_picks_minimum() {
        // Upstream cycle is better.
        let (graph, expected) = competing_cycles(1, 5, 0);
        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, expected);
        assert_eq!(
            {
                let mut c = solution.cycle.clone();
                c.sort_unstable();
                c
            },
            vec![0, 1]
        );

        // Downstream cycle is better.
        let (graph, expected) = competing_cycles(5, 1, 0);
        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, expected);
        assert_eq!(
            {
                let mut c = solution.cycle.clone();
                c.sort_unstable();
                c
            },
            vec![2, 3]
        );
    }

    #[test]
    fn bridge_weight_cannot_influence_result() {
        // The bridge is not on any cycle, so even an extreme weight on it
        // must leave the answer untouched.
        for bridge_weight in [-1000, -1, 0, 1, 1000] {
            let (graph, expected) = competing_cycles(2, 7, bridge_weight);
            let solution = solve(&graph, f64::INFINITY);
            assert_ratio_eq(solution.lambda, expected);
            assert_reduced_cost_consistent(&graph, &solution);
        }
    }

    #[test]
    fn lambda_never_exceeds_the_given_bound() {
        // True minimum is 3.0, but the caller claims 1.0 was already found
        // in an earlier SCC. Nothing here beats it.
        let mut edges = vec![(0, 0, 6, 2)];
        let graph = build_graph(&mut edges, 1);

        let solution = solve(&graph, 1.0);

        assert_ratio_eq(solution.lambda, 1.0);
        assert!(!solution.improved());
        assert!(solution.cycle.is_empty());
    }

    #[test]
    fn reentry_with_previous_lambda_is_idempotent() {
        let mut edges = vec![(0, 1, 1, 2), (1, 2, 4, 3), (2, 0, 7, 1), (1, 0, 5, 4)];
        let graph = build_graph(&mut edges, 3);

        let first = solve(&graph, f64::INFINITY);
        let second = solve(&graph, first.lambda);

        assert_ratio_eq(second.lambda, first.lambda);
        assert!(!second.improved());
    }

    #[test]
    fn converged_policy_edges_are_real_outgoing_edges() {
        let mut edges = vec![(0, 1, 3, 1), (1, 2, 3, 1), (2, 0, 3, 1), (1, 0, 1, 1)];
        let graph = build_graph(&mut edges, 3);

        let solution = solve(&graph, f64::INFINITY);

        assert_eq!(solution.policy.len(), 3);
        for (u, &e) in solution.policy.iter().enumerate() {
            assert_eq!(graph.edge_source(e), u);
        }
    }

    #[test]
    fn empty_graph_is_rejected() {
        let graph = build_graph(&mut [], 0);
        let result = HowardSolver.min_cycle_ratio(&graph, f64::INFINITY);

        assert_eq!(result.unwrap_err(), Error::EmptyGraph);
    }

    #[test]
    fn node_without_outgoing_edge_is_rejected() {
        let mut edges = vec![(0, 1, 1, 1)];
        let graph = build_graph(&mut edges, 2);

        let result = HowardSolver.min_cycle_ratio(&graph, f64::INFINITY);
        assert_eq!(result.unwrap_err(), Error::MissingOutgoingEdge(1));
    }

    #[test]
    fn zero_transit_cycle_is_rejected() {
        let mut edges = vec![(0, 1, 1, 0), (1, 0, 1, 0)];
        let graph = build_graph(&mut edges, 2);

        let result = HowardSolver.min_cycle_ratio(&graph, f64::INFINITY);
        assert!(matches!(result.unwrap_err(), Error::ZeroTransitCycle(_)));
    }

    #[test]
    fn zero_transit_edge_off_cycle_is_fine() {
        // The zero-transit edge is a bridge; only cycles need positive
        // transit sums.
        let mut edges = vec![(0, 1, 2, 0), (1, 2, 3, 1), (2, 1, 3, 1), (0, 0, 9, 1)];
        let graph = build_graph(&mut edges, 3);

        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, 3.0);
    }

    #[test]
    fn parallel_edges_pick_the_cheaper_one() {
        // Two parallel self-loops; only the cheaper ratio matters.
        let mut edges = vec![(0, 0, 10, 1), (0, 0, 4, 2)];
        let graph = build_graph(&mut edges, 1);

        let solution = solve(&graph, f64::INFINITY);
        assert_ratio_eq(solution.lambda, 2.0);
    }

    #[test]
    fn larger_graph_with_nested_cycles() {
        // 5-ring (ratio 2) with two chords carving out smaller cycles:
        //   1 -> 0 closes 0,1 with ratio (2 + 1)/2 = 1.5
        //   3 -> 1 closes 1,2,3 with ratio (2 + 2 + 5)/3 = 3
        let mut edges = vec![
            (0, 1, 2, 1),
            (1, 2, 2, 1),
            (2, 3, 2, 1),
            (3, 4, 2, 1),
            (4, 0, 2, 1),
            (1, 0, 1, 1),
            (3, 1, 5, 1),
        ];
        let graph = build_graph(&mut edges, 5);

        let solution = solve(&graph, f64::INFINITY);

        assert_ratio_eq(solution.lambda, 1.5);
        assert_reduced_cost_consistent(&graph, &solution);
    }
}
