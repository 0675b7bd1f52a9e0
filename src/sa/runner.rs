//! Annealing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::trace;

use super::config::{AnnealConfig, CoolingPolicy, Tracking};
use super::types::AnnealProblem;

/// One logged penalty value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub iteration: usize,
    pub penalty: f64,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S: Clone> {
    /// Final current solution, or the best one under [`Tracking::BestOnly`].
    pub solution: S,

    /// Cost of `solution`.
    pub cost: f64,

    /// Lowest cost seen during the run.
    pub best_cost: f64,

    /// Iterations executed.
    pub iterations: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Candidates rejected for breaking a hard rule.
    pub infeasible_moves: usize,

    /// Iterations where no candidate could be formed.
    pub idle_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Logged penalties, see [`Tracking`].
    pub trace: Vec<TracePoint>,
}

/// Executes the annealing state machine: initialize, explore for a fixed
/// iteration budget, terminate.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs one annealing pass.
    ///
    /// # Errors
    ///
    /// Propagates the problem's failure to build a starting solution.
    /// Nothing after initialization can fail.
    pub fn run<P, R>(
        problem: &P,
        config: &AnnealConfig,
        rng: &mut R,
    ) -> Result<AnnealResult<P::Solution>, P::Error>
    where
        P: AnnealProblem,
        R: Rng + ?Sized,
    {
        Self::run_with_cancel(problem, config, rng, None)
    }

    /// Runs one annealing pass with an optional cancellation token,
    /// checked between iterations.
    pub fn run_with_cancel<P, R>(
        problem: &P,
        config: &AnnealConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult<P::Solution>, P::Error>
    where
        P: AnnealProblem,
        R: Rng + ?Sized,
    {
        // Initialize
        let mut current = problem.initial_solution(rng)?;
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.t_start;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut infeasible_moves = 0usize;
        let mut idle_moves = 0usize;
        let mut cancelled = false;

        let mut trace = Vec::new();
        if config.tracking == Tracking::AllIterations {
            trace.reserve(config.max_iterations + 1);
            trace.push(TracePoint {
                iteration: 0,
                penalty: current_cost,
            });
        }

        // Explore
        for step in 1..=config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            iterations = step;

            let evaluated = match problem.neighbor(&current, rng) {
                None => {
                    idle_moves += 1;
                    false
                }
                Some(candidate) if !problem.is_feasible(&candidate) => {
                    infeasible_moves += 1;
                    false
                }
                Some(candidate) => {
                    let candidate_cost = problem.cost(&candidate);
                    let delta = candidate_cost - current_cost;

                    // Metropolis acceptance criterion
                    let accept = if delta < 0.0 {
                        improving_moves += 1;
                        true
                    } else {
                        let probability = (-delta / temperature).exp();
                        rng.random_range(0.0..1.0) < probability
                    };

                    if accept {
                        current = candidate;
                        current_cost = candidate_cost;
                        accepted_moves += 1;

                        if current_cost < best_cost {
                            best = current.clone();
                            best_cost = current_cost;
                        }
                    }

                    if config.tracking == Tracking::AllIterations {
                        trace.push(TracePoint {
                            iteration: step,
                            penalty: current_cost,
                        });
                    }
                    true
                }
            };

            // Cool down
            if evaluated || config.cooling_policy == CoolingPolicy::EveryIteration {
                temperature = (temperature * config.cooling_rate).max(config.t_end);
            }
        }

        trace!(
            event = "anneal_end",
            iterations,
            accepted_moves,
            infeasible_moves,
            idle_moves,
            best_cost,
            final_temperature = temperature,
        );

        // Terminate
        let (solution, cost) = match config.tracking {
            Tracking::AllIterations => (current, current_cost),
            Tracking::BestOnly => {
                trace.push(TracePoint {
                    iteration: iterations,
                    penalty: best_cost,
                });
                (best, best_cost)
            }
        };

        Ok(AnnealResult {
            solution,
            cost,
            best_cost,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            infeasible_moves,
            idle_moves,
            cancelled,
            trace,
        })
    }
}
