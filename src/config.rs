//! Draw configuration.
//!
//! A [`DrawConfig`] describes the group layout, seed designations,
//! penalty weights, annealing schedule and the shape of a scenario.
//! It is plain data: loading it never touches the roster, and
//! [`DrawModel::new`](crate::model::DrawModel::new) performs the
//! roster-dependent checks.
//!
//! # Examples
//!
//! ```
//! use u_draw::config::DrawConfig;
//!
//! let config = DrawConfig::from_toml_str(r#"
//!     num_runs = 10
//!     memory_horizon = 2
//!
//!     [[groups]]
//!     label = "A"
//!     capacity = 2
//!     bracket_position = 1
//!
//!     [[groups]]
//!     label = "B"
//!     capacity = 2
//!     bracket_position = 16
//!
//!     [anneal]
//!     max_iterations = 50
//! "#).unwrap();
//!
//! assert_eq!(config.groups.len(), 2);
//! assert!(config.seed_groups.is_none());
//! assert_eq!(config.memory_horizon, Some(2));
//! assert_eq!(config.anneal.max_iterations, 50);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::HorizonPolicy;
use crate::model::Group;
use crate::penalty::PenaltyWeights;
use crate::sa::{AnnealConfig, CalibrationConfig};

/// Groups designated for each seed classification, by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedGroups {
    pub rank_one: String,
    pub rank_two: String,
    pub pool_three_four: [String; 2],
    pub pool_five_eight: [String; 4],
}

impl SeedGroups {
    /// Every designated label, rank one first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        [&self.rank_one, &self.rank_two]
            .into_iter()
            .chain(self.pool_three_four.iter())
            .chain(self.pool_five_eight.iter())
            .map(String::as_str)
    }
}

/// Complete configuration of a draw scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Group layout, in draw order. Empty when a file omits it.
    #[serde(default)]
    pub groups: Vec<Group>,

    /// Seed designations. `None` means the roster carries no seeds.
    #[serde(default)]
    pub seed_groups: Option<SeedGroups>,

    pub weights: PenaltyWeights,

    pub anneal: AnnealConfig,

    pub calibration: CalibrationConfig,

    /// Annealing runs per scenario.
    pub num_runs: usize,

    /// Runs retained in history. `None` keeps everything.
    pub memory_horizon: Option<usize>,

    pub horizon_policy: HorizonPolicy,

    /// Runs folded into a scratch history before calibration.
    pub warm_up_runs: usize,

    /// Retry bound of the feasible assignment generator.
    pub max_generation_attempts: usize,

    /// Retry bound of the neighbor generator.
    pub max_neighbor_attempts: usize,

    /// Seed of the session random stream.
    pub seed: u64,
}

impl Default for DrawConfig {
    /// The reference tournament: eleven groups A..K of three, group G of
    /// four, winners feeding a 16-slot bracket.
    fn default() -> Self {
        const LAYOUT: [(&str, usize, u8); 11] = [
            ("A", 3, 1),
            ("B", 3, 16),
            ("C", 3, 12),
            ("D", 3, 5),
            ("E", 3, 7),
            ("F", 3, 10),
            ("G", 4, 3),
            ("H", 3, 14),
            ("I", 3, 9),
            ("J", 3, 8),
            ("K", 3, 13),
        ];

        Self {
            groups: LAYOUT
                .iter()
                .map(|&(label, capacity, pos)| Group::new(label, capacity, pos))
                .collect(),
            seed_groups: Some(SeedGroups {
                rank_one: "A".into(),
                rank_two: "B".into(),
                pool_three_four: ["C".into(), "D".into()],
                pool_five_eight: ["E".into(), "F".into(), "G".into(), "H".into()],
            }),
            weights: PenaltyWeights::default(),
            anneal: AnnealConfig::default(),
            calibration: CalibrationConfig::default(),
            num_runs: 100,
            memory_horizon: None,
            horizon_policy: HorizonPolicy::default(),
            warm_up_runs: 10,
            max_generation_attempts: 5000,
            max_neighbor_attempts: 200,
            seed: 42,
        }
    }
}

impl DrawConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_seed_groups(mut self, seed_groups: Option<SeedGroups>) -> Self {
        self.seed_groups = seed_groups;
        self
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_num_runs(mut self, n: usize) -> Self {
        self.num_runs = n;
        self
    }

    pub fn with_memory_horizon(mut self, horizon: Option<usize>) -> Self {
        self.memory_horizon = horizon;
        self
    }

    pub fn with_horizon_policy(mut self, policy: HorizonPolicy) -> Self {
        self.horizon_policy = policy;
        self
    }

    pub fn with_warm_up_runs(mut self, n: usize) -> Self {
        self.warm_up_runs = n;
        self
    }

    pub fn with_max_generation_attempts(mut self, n: usize) -> Self {
        self.max_generation_attempts = n;
        self
    }

    pub fn with_max_neighbor_attempts(mut self, n: usize) -> Self {
        self.max_neighbor_attempts = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates numeric ranges. Roster-dependent checks happen in
    /// [`DrawModel::new`](crate::model::DrawModel::new).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.is_empty() {
            return Err(ConfigError::Invalid("at least one group is required".into()));
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_generation_attempts must be positive".into(),
            ));
        }
        if self.max_neighbor_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_neighbor_attempts must be positive".into(),
            ));
        }
        self.weights.validate().map_err(ConfigError::Invalid)?;
        self.anneal.validate().map_err(ConfigError::Invalid)?;
        self.calibration.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}
