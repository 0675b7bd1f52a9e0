//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima. Candidates that break a hard rule are never accepted.
//!
//! The schedule can be calibrated empirically with [`Calibrator`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Ben-Ameur (2004), "Computing the Initial Temperature of Simulated Annealing"

mod calibrate;
mod config;
mod runner;
mod types;

pub use calibrate::{median, Calibration, Calibrator, ProbeResult};
pub use config::{AnnealConfig, CalibrationConfig, CoolingPolicy, Tracking};
pub use runner::{AnnealResult, AnnealRunner, TracePoint};
pub use types::AnnealProblem;
