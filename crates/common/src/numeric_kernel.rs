/// Tolerance for potential comparisons in the parametric relaxation.
///
/// A candidate potential must undercut the stored one by more than this
/// amount before an edge is adopted into the policy graph; without the gate,
/// float noise around equal-ratio cycles keeps the relaxation pass "improving"
/// forever and the solver never reaches its primary exit.
pub const EPSILON: f64 = 1e-8;

/// Reduced-cost candidate potential for the source of an edge `u -> v`.
///
/// This is the one formula shared by the reverse-BFS potential propagation
/// and the global relaxation pass: the target's potential plus the edge
/// weight, discounted by `lambda` per unit of transit time.
#[inline]
pub fn reduced_cost(potential_v: f64, weight: i64, transit: i64, lambda: f64) -> f64 {
    potential_v + weight as f64 - lambda * transit as f64
}

/// Epsilon gate: does `candidate` strictly improve on `old_potential`?
///
/// Written as `old - candidate > EPSILON` (not `candidate < old`) so that
/// improvements smaller than the tolerance are ignored.
#[inline]
pub fn strictly_improves(old_potential: f64, candidate: f64) -> bool {
    old_potential - candidate > EPSILON
}
