//! Annealing schedule and calibration settings.

use serde::{Deserialize, Serialize};

/// Whether temperature drops on iterations that evaluated no move.
///
/// An iteration evaluates no move when the neighbor generator found no
/// swap, or the proposed swap broke a hard rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingPolicy {
    /// Cool after every iteration, evaluated or not.
    #[default]
    EveryIteration,
    /// Cool only after iterations that scored a valid candidate.
    EvaluatedMovesOnly,
}

/// What a run records and returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tracking {
    /// Trace the current penalty at every evaluated iteration and return
    /// the final current state.
    #[default]
    AllIterations,
    /// Trace only the best penalty of the run and return the best state.
    BestOnly,
}

/// Configuration of one annealing run.
///
/// Temperature follows `T <- max(t_end, T * cooling_rate)`.
///
/// # Examples
///
/// ```
/// use u_draw::sa::{AnnealConfig, CoolingPolicy, Tracking};
///
/// let config = AnnealConfig::default()
///     .with_t_start(2.0)
///     .with_cooling_rate(0.99)
///     .with_max_iterations(500)
///     .with_cooling_policy(CoolingPolicy::EvaluatedMovesOnly)
///     .with_tracking(Tracking::BestOnly);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealConfig {
    /// Starting temperature.
    pub t_start: f64,

    /// Temperature floor.
    pub t_end: f64,

    /// Geometric cooling factor in (0, 1].
    pub cooling_rate: f64,

    /// Iteration budget of a run.
    pub max_iterations: usize,

    pub cooling_policy: CoolingPolicy,

    pub tracking: Tracking,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            t_start: 5.0,
            t_end: 0.01,
            cooling_rate: 0.999,
            max_iterations: 200,
            cooling_policy: CoolingPolicy::default(),
            tracking: Tracking::default(),
        }
    }
}

impl AnnealConfig {
    pub fn with_t_start(mut self, t: f64) -> Self {
        self.t_start = t;
        self
    }

    pub fn with_t_end(mut self, t: f64) -> Self {
        self.t_end = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_cooling_policy(mut self, policy: CoolingPolicy) -> Self {
        self.cooling_policy = policy;
        self
    }

    pub fn with_tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.t_start.is_finite() && self.t_start > 0.0) {
            return Err(format!("t_start must be positive, got {}", self.t_start));
        }
        if !(self.t_end.is_finite() && self.t_end > 0.0) {
            return Err(format!("t_end must be positive, got {}", self.t_end));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}

/// Settings of the empirical temperature calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub enabled: bool,

    /// Positive deltas to collect. At most `10 * samples` moves are tried.
    pub samples: usize,

    /// Desired acceptance probability of a median worsening move.
    pub p_target: f64,

    /// Multiplier on the derived starting temperature.
    pub factor: f64,

    /// Lower bound on the derived cooling rate.
    pub min_cooling: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            samples: 300,
            p_target: 0.7,
            factor: 4.0,
            min_cooling: 0.985,
        }
    }
}

impl CalibrationConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_samples(mut self, n: usize) -> Self {
        self.samples = n;
        self
    }

    pub fn with_p_target(mut self, p: f64) -> Self {
        self.p_target = p;
        self
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_min_cooling(mut self, rate: f64) -> Self {
        self.min_cooling = rate;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.samples == 0 {
            return Err("calibration samples must be positive".into());
        }
        if !(self.p_target > 0.0 && self.p_target < 1.0) {
            return Err(format!("p_target must be in (0, 1), got {}", self.p_target));
        }
        if !(self.factor.is_finite() && self.factor > 0.0) {
            return Err(format!("factor must be positive, got {}", self.factor));
        }
        if !(self.min_cooling > 0.0 && self.min_cooling <= 1.0) {
            return Err(format!(
                "min_cooling must be in (0, 1], got {}",
                self.min_cooling
            ));
        }
        Ok(())
    }
}
