//! Constrained group-draw optimizer.
//!
//! Repeatedly assigns a fixed roster of players to capacity-bounded
//! groups under hard placement rules, while minimizing how often players
//! meet again across many independent draws.
//!
//! - **Model**: players, groups, seeds and the hard rules (seed
//!   placement, one player per club per group, one seed per group).
//! - **Draw**: feasible assignment generation with bounded retries, and
//!   pairwise-swap neighbors that never move seeded players.
//! - **Penalty**: group revisits, squared pair repeats, triple and
//!   quadruple repeats, and light bracket clustering of clubs.
//! - **History**: cross-run co-occurrence counts with a memory horizon.
//! - **Simulated Annealing (SA)**: generic accept/reject loop over a
//!   constrained problem, with empirical temperature calibration.
//! - **Scenario**: many runs folded into one history, horizon sweeps,
//!   exportable records.
//!
//! # Examples
//!
//! ```
//! use u_draw::config::DrawConfig;
//! use u_draw::model::{Group, Player};
//! use u_draw::scenario::DrawSession;
//!
//! let config = DrawConfig::default()
//!     .with_groups(vec![Group::new("A", 2, 1), Group::new("B", 2, 16)])
//!     .with_seed_groups(None)
//!     .with_num_runs(3);
//! let roster = vec![
//!     Player::new("Ana", "North"),
//!     Player::new("Ben", "North"),
//!     Player::new("Cid", "South"),
//!     Player::new("Dee", "South"),
//! ];
//!
//! let session = DrawSession::new(roster, config).unwrap();
//! let report = session.run_seeded().unwrap();
//! for run in &report.runs {
//!     assert!(session.model().is_valid(&run.assignment));
//! }
//! ```

pub mod config;
pub mod draw;
pub mod error;
pub mod history;
pub mod model;
pub mod penalty;
pub mod sa;
pub mod scenario;

pub use error::{ConfigError, DrawError, Result};
