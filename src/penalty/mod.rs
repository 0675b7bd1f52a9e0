//! Penalty model.
//!
//! The objective minimized by annealing: repeated group visits, repeated
//! pairings (squared), triples and quadruples from the history store, plus
//! a light penalty for same-club players clustering in one bracket half
//! or quarter.

mod evaluator;
mod weights;

pub use evaluator::{PenaltyBreakdown, PenaltyEvaluator};
pub use weights::PenaltyWeights;
