//! Shared test fixtures.

use super::{DrawModel, Group, Player, Seed};
use crate::config::DrawConfig;

/// 34 players over 17 clubs (two players each) with the full seed set,
/// matching the default reference layout.
pub(crate) fn reference_roster() -> Vec<Player> {
    (1..=34)
        .map(|i| {
            let seed = match i {
                1 => Seed::RankOne,
                2 => Seed::RankTwo,
                3 | 4 => Seed::PoolThreeFour,
                5..=8 => Seed::PoolFiveEight,
                _ => Seed::None,
            };
            Player::new(format!("P{i:02}"), format!("Club{}", i % 17)).with_seed(seed)
        })
        .collect()
}

pub(crate) fn reference_model() -> DrawModel {
    DrawModel::new(reference_roster(), &DrawConfig::default()).unwrap()
}

/// Two groups of two, clubs {P1:X, P2:X, P3:Y, P4:Y}, no seeds.
pub(crate) fn two_club_config() -> DrawConfig {
    DrawConfig::default()
        .with_groups(vec![Group::new("A", 2, 1), Group::new("B", 2, 16)])
        .with_seed_groups(None)
}

pub(crate) fn two_club_roster() -> Vec<Player> {
    vec![
        Player::new("P1", "X"),
        Player::new("P2", "X"),
        Player::new("P3", "Y"),
        Player::new("P4", "Y"),
    ]
}

pub(crate) fn two_club_model() -> DrawModel {
    DrawModel::new(two_club_roster(), &two_club_config()).unwrap()
}
