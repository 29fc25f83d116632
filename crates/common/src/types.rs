/// Result of one minimum-cycle-ratio computation over a single SCC.
///
/// Besides the ratio itself, the solver reports the vertices of the best
/// cycle it settled on and the converged node potentials, so callers can
/// inspect the witness cycle or verify the reduced-cost post-condition
/// without re-running the relaxation.
///
/// Fields:
/// - `lambda`: The minimum cycle ratio found, never above the bound the
///   caller passed in.
/// - `cycle`: Vertices of the best cycle, in policy-edge order. Empty when
///   the caller's bound was never improved (no cycle in this SCC beats it).
/// - `potentials`: Final node potentials, indexed by node id.
/// - `policy`: Converged policy graph as one edge id per node (each node's
///   selected outgoing edge).
#[derive(Debug, Clone)]
pub struct RatioSolution {
    pub lambda: f64,
    pub cycle: Vec<usize>,
    pub potentials: Vec<f64>,
    pub policy: Vec<usize>,
}

impl RatioSolution {
    /// Returns true if this SCC contained a cycle strictly better than the
    /// bound the caller started from.
    pub fn improved(&self) -> bool {
        !self.cycle.is_empty()
    }
}

/// Type alias for a single edge: (from, to, weight, transit)
pub type Edge = (usize, usize, i64, i64);
