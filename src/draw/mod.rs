//! Assignment construction and perturbation.
//!
//! [`FeasibleGenerator`] builds a valid draw from scratch with bounded
//! retries; [`NeighborGenerator`] proposes single [`Swap`] moves for
//! local search.

mod generator;
mod neighbor;

pub use generator::FeasibleGenerator;
pub use neighbor::{NeighborGenerator, Swap};
