use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Indicates an attempt to access a node index that exceeds the graph size (N).
    #[error("Node index {0} is out of bounds.")]
    NodeIndexOutOfBounds(usize),

    /// Indicates a structural inconsistency found during graph processing or validation.
    #[error("Graph structure is invalid or inconsistent.")]
    InvalidGraph,

    /// The solver was handed a graph with no nodes at all.
    #[error("Graph has no nodes; the minimum cycle ratio is undefined.")]
    EmptyGraph,

    /// A node with out-degree zero cannot carry a policy edge, so the input
    /// was not a single strongly connected component as required.
    #[error("Node {0} has no outgoing edge; input must be a single SCC.")]
    MissingOutgoingEdge(usize),

    /// A policy cycle whose transit times sum to zero has no defined ratio.
    #[error("Cycle through node {0} has zero total transit time.")]
    ZeroTransitCycle(usize),
}
