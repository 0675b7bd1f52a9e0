//! Error types for the draw optimizer.

use thiserror::Error;

/// Configuration error, detected before any optimization starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Total group capacity cannot hold the roster.
    #[error("total group capacity {capacity} is smaller than roster size {players}")]
    CapacityShortfall { capacity: usize, players: usize },

    /// Wrong number of players carry a seed classification.
    #[error("expected exactly {expected} player(s) seeded {seed}, found {found}")]
    SeedCount {
        seed: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown group label: {0}")]
    UnknownGroup(String),

    #[error("duplicate group label: {0}")]
    DuplicateGroup(String),

    #[error("duplicate player name: {0}")]
    DuplicatePlayer(String),

    #[error("group {group} has bracket position {position}, expected 1..=16")]
    BracketPosition { group: String, position: u8 },

    /// A group is designated for more than one seed slot.
    #[error("group {0} is designated for more than one seed")]
    SeedGroupOverlap(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main error type for draw operations.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The bounded generation loop never produced a valid assignment.
    ///
    /// Usually means the layout is contended: too many players from one
    /// club for the number of groups.
    #[error("no feasible assignment found after {attempts} attempts")]
    FeasibleAssignmentNotFound { attempts: usize },
}

/// Result type alias for draw operations.
pub type Result<T> = std::result::Result<T, DrawError>;
