use common::{error::Error, types::RatioSolution};

/// Capability interface for the graph collaborator.
///
/// The solver only ever touches a graph through these eight accessors, so it
/// stays decoupled from the concrete storage layout. Nodes are `0..node_count`
/// and edges `0..edge_count`; each edge carries an integer weight and an
/// integer transit time. The reverse-adjacency pair (`in_degree`,
/// `predecessor_edge_source`) drives the reverse breadth-first potential
/// update and must enumerate exactly the edges whose target is the given node.
pub trait RatioGraph {
    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;

    fn edge_source(&self, edge: usize) -> usize;
    fn edge_target(&self, edge: usize) -> usize;
    fn edge_weight(&self, edge: usize) -> i64;
    fn edge_transit(&self, edge: usize) -> i64;

    fn in_degree(&self, node: usize) -> usize;
    /// Source node of the i-th incoming edge of `node`, for i in `0..in_degree(node)`.
    fn predecessor_edge_source(&self, node: usize, i: usize) -> usize;
}

/// Trait for solvers computing the minimum cycle ratio of a single SCC.
pub trait CycleRatioSolver {
    /// Computes the minimum cycle ratio of `graph`, starting from the upper
    /// bound `lambda_so_far` (typically a running minimum across SCCs).
    ///
    /// Returns `Ok(solution)` with `solution.lambda <= lambda_so_far`, or
    /// `Err(e)` if the input violates the solver's preconditions.
    fn min_cycle_ratio<G: RatioGraph>(
        &self,
        graph: &G,
        lambda_so_far: f64,
    ) -> Result<RatioSolution, Error>;
}

/// FIFO queue of node ids used by the reverse breadth-first pass.
///
/// Implementations are bounded by the node count; the solver never holds more
/// than one pending entry per node.
pub trait NodeQueue {
    fn reset(&mut self);
    fn push(&mut self, node: usize);
    fn pop(&mut self) -> Option<usize>;
    fn is_empty(&self) -> bool;
}
