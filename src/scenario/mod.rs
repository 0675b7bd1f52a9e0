//! Draw scenarios.
//!
//! A scenario is a sequence of annealing runs sharing one
//! [`HistoryStore`](crate::history::HistoryStore): each run is optimized
//! against the repetitions of the runs before it, then folded in.
//! [`DrawSession`] owns the validated model and drives warm-up,
//! calibration, single scenarios and horizon sweeps.

mod problem;
mod report;
mod runner;

pub use problem::DrawProblem;
pub use report::{
    assignment_records, AssignmentRecord, PenaltyRecord, RunOutcome, UniformitySummary,
};
pub use runner::{DrawSession, ScenarioReport};
