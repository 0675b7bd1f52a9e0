//! Multi-run draw scenarios.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::problem::DrawProblem;
use super::report::{
    assignment_records, AssignmentRecord, PenaltyRecord, RunOutcome, UniformitySummary,
};
use crate::config::DrawConfig;
use crate::error::Result;
use crate::history::{FoldOutcome, HistoryStore};
use crate::model::{DrawModel, Player};
use crate::sa::{AnnealConfig, AnnealRunner, Calibrator, ProbeResult};

/// Everything one scenario produced.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Memory horizon the scenario ran with.
    pub horizon: Option<usize>,
    /// Schedule every run used.
    pub anneal: AnnealConfig,
    pub runs: Vec<RunOutcome>,
    pub assignments: Vec<AssignmentRecord>,
    pub penalty_trace: Vec<PenaltyRecord>,
    pub uniformity: UniformitySummary,
    /// Hard resets of the history store.
    pub resets: usize,
    /// Whether the scenario stopped early on cancellation.
    pub cancelled: bool,
}

/// Drives scenarios: repeated annealing runs folded into one history.
///
/// # Examples
///
/// ```
/// use u_draw::config::DrawConfig;
/// use u_draw::model::{Group, Player};
/// use u_draw::scenario::DrawSession;
///
/// let config = DrawConfig::default()
///     .with_groups(vec![Group::new("A", 2, 1), Group::new("B", 2, 16)])
///     .with_seed_groups(None)
///     .with_num_runs(5)
///     .with_memory_horizon(Some(2));
/// let roster = vec![
///     Player::new("P1", "X"),
///     Player::new("P2", "X"),
///     Player::new("P3", "Y"),
///     Player::new("P4", "Y"),
/// ];
///
/// let session = DrawSession::new(roster, config).unwrap();
/// let report = session.run_seeded().unwrap();
/// assert_eq!(report.runs.len(), 5);
/// assert_eq!(report.assignments.len(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct DrawSession {
    model: DrawModel,
    config: DrawConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl DrawSession {
    /// Validates the roster against the configuration.
    ///
    /// # Errors
    ///
    /// [`DrawError::Config`](crate::error::DrawError::Config) naming the
    /// violated rule.
    pub fn new(players: Vec<Player>, config: DrawConfig) -> Result<Self> {
        let model = DrawModel::new(players, &config)?;
        Ok(Self {
            model,
            config,
            cancel: None,
        })
    }

    /// Installs a cancellation flag, checked between iterations and runs.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn model(&self) -> &DrawModel {
        &self.model
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Session random stream, seeded from the configuration.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.config.seed)
    }

    /// Resolves the annealing schedule.
    ///
    /// With calibration enabled, first folds `warm_up_runs` runs into a
    /// scratch history, then calibrates against it. Otherwise returns the
    /// configured schedule untouched and draws nothing from `rng`.
    pub fn prepare<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AnnealConfig> {
        let anneal = self.config.anneal;
        if !self.config.calibration.enabled {
            return Ok(anneal);
        }

        let mut scratch = HistoryStore::unbounded(self.model.n_players(), self.model.n_groups());
        for _ in 0..self.config.warm_up_runs {
            let problem = DrawProblem::new(&self.model, &scratch, &self.config);
            let result = AnnealRunner::run(&problem, &anneal, rng)?;
            scratch.fold(&result.solution);
        }
        debug!(event = "warm_up_end", runs = self.config.warm_up_runs);

        let problem = DrawProblem::new(&self.model, &scratch, &self.config);
        let calibration = Calibrator::calibrate(&problem, &self.config.calibration, &anneal, rng)?;
        Ok(calibration.apply(&anneal))
    }

    /// Prepares the schedule and runs one scenario at the configured
    /// memory horizon, from the session seed.
    pub fn run_seeded(&self) -> Result<ScenarioReport> {
        let mut rng = self.rng();
        let anneal = self.prepare(&mut rng)?;
        self.run_scenario(self.config.memory_horizon, &anneal, &mut rng)
    }

    /// Runs `num_runs` annealing runs against a fresh history with the
    /// given horizon.
    ///
    /// # Errors
    ///
    /// Stops at the first run whose starting assignment can't be built.
    pub fn run_scenario<R: Rng + ?Sized>(
        &self,
        horizon: Option<usize>,
        anneal: &AnnealConfig,
        rng: &mut R,
    ) -> Result<ScenarioReport> {
        info!(
            event = "draw_scenario_start",
            horizon = ?horizon,
            runs = self.config.num_runs,
            t_start = anneal.t_start,
            cooling_rate = anneal.cooling_rate,
        );

        let mut history = HistoryStore::new(
            self.model.n_players(),
            self.model.n_groups(),
            horizon,
            self.config.horizon_policy,
        );
        let mut runs = Vec::with_capacity(self.config.num_runs);
        let mut assignments = Vec::new();
        let mut penalty_trace = Vec::new();
        let mut cancelled = false;

        for run_id in 1..=self.config.num_runs {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            let problem = DrawProblem::new(&self.model, &history, &self.config);
            let result =
                AnnealRunner::run_with_cancel(&problem, anneal, rng, self.cancel.clone())?;
            let breakdown = problem.evaluator().breakdown(&result.solution);

            penalty_trace.extend(result.trace.iter().map(|point| PenaltyRecord {
                run_id,
                iteration: point.iteration,
                penalty: point.penalty,
            }));
            assignments.extend(assignment_records(&self.model, run_id, &result.solution));

            let fold = history.fold(&result.solution);
            debug!(
                event = "draw_run_end",
                run_id,
                penalty = result.cost,
                accepted_moves = result.accepted_moves,
                fold = ?fold,
            );
            if fold == FoldOutcome::Reset {
                debug!(
                    event = "history_reset",
                    run_id,
                    total = breakdown.total,
                    group_repetition = breakdown.group_repetition,
                    pair = breakdown.pair,
                    triple = breakdown.triple,
                    quad = breakdown.quad,
                    half_clustering = breakdown.half_clustering,
                    quarter_clustering = breakdown.quarter_clustering,
                );
            }

            runs.push(RunOutcome {
                run_id,
                assignment: result.solution,
                breakdown,
                fold,
            });

            if result.cancelled {
                cancelled = true;
                break;
            }
        }

        let uniformity =
            UniformitySummary::from_draws(&self.model, runs.iter().map(|r| &r.assignment));
        info!(
            event = "draw_scenario_end",
            horizon = ?horizon,
            runs = runs.len(),
            resets = history.resets(),
            median_spread_unseeded = uniformity.median_unseeded,
            cancelled,
        );

        Ok(ScenarioReport {
            horizon,
            anneal: *anneal,
            runs,
            assignments,
            penalty_trace,
            uniformity,
            resets: history.resets(),
            cancelled,
        })
    }

    /// Runs one scenario per horizon, each with its own history.
    ///
    /// The schedule is prepared once from the session stream. Scenario `i`
    /// then draws from its own stream seeded with `seed + i + 1`, so the
    /// results do not depend on execution order. With the `parallel`
    /// feature the scenarios run on the rayon pool.
    pub fn sweep(&self, horizons: &[Option<usize>]) -> Result<Vec<ScenarioReport>> {
        let anneal = self.prepare(&mut self.rng())?;
        let scenario_seed = |i: usize| self.config.seed.wrapping_add(i as u64 + 1);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            horizons
                .par_iter()
                .enumerate()
                .map(|(i, &horizon)| {
                    let mut rng = ChaCha8Rng::seed_from_u64(scenario_seed(i));
                    self.run_scenario(horizon, &anneal, &mut rng)
                })
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            horizons
                .iter()
                .enumerate()
                .map(|(i, &horizon)| {
                    let mut rng = ChaCha8Rng::seed_from_u64(scenario_seed(i));
                    self.run_scenario(horizon, &anneal, &mut rng)
                })
                .collect()
        }
    }

    /// Short probe of a candidate starting temperature against an empty
    /// history. See [`Calibrator::probe`].
    pub fn probe_temperature<R: Rng + ?Sized>(
        &self,
        t_start: f64,
        iterations: usize,
        rng: &mut R,
    ) -> Result<ProbeResult> {
        let history = HistoryStore::unbounded(self.model.n_players(), self.model.n_groups());
        let problem = DrawProblem::new(&self.model, &history, &self.config);
        Calibrator::probe(&problem, t_start, iterations, rng)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
