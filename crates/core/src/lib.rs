pub mod csr;
pub mod queue;
pub mod solver;
pub mod traits;

pub use csr::GraphCSR;
pub use solver::HowardSolver;
