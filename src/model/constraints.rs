//! Validated roster and layout, and the hard placement rules.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::assignment::Assignment;
use super::types::{Group, GroupId, Player, PlayerId, Seed, BRACKET_SIZE};
use crate::config::{DrawConfig, SeedGroups};
use crate::error::ConfigError;

/// Seed designations resolved to group indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSlots {
    pub rank_one: GroupId,
    pub rank_two: GroupId,
    pub pool_three_four: [GroupId; 2],
    pub pool_five_eight: [GroupId; 4],
}

/// A broken hard rule, as reported by [`DrawModel::first_violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Two members of `group` share a club.
    ClubClash { group: GroupId, club: usize },
    /// A seeded player sits outside its allowed groups.
    SeedMisplaced { player: PlayerId, group: GroupId },
    /// `group` holds more than one seeded player.
    MultipleSeeds { group: GroupId },
    /// `group` holds more members than its capacity.
    OverCapacity { group: GroupId },
}

/// Roster plus layout, checked for consistency once at startup.
///
/// Owns the constraint model: [`allowed_groups`](Self::allowed_groups)
/// and [`is_valid`](Self::is_valid) are pure functions of it.
#[derive(Debug, Clone)]
pub struct DrawModel {
    players: Vec<Player>,
    groups: Vec<Group>,
    club_of: Vec<usize>,
    club_names: Vec<String>,
    seed_slots: Option<SeedSlots>,
}

impl DrawModel {
    /// Builds the model, rejecting any roster/layout mismatch.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::CapacityShortfall`] if the groups cannot hold the roster
    /// - [`ConfigError::SeedCount`] if a seed classification has the wrong
    ///   number of players (or any seeds exist without seed groups)
    /// - [`ConfigError::UnknownGroup`] / [`ConfigError::SeedGroupOverlap`] for
    ///   bad seed designations
    /// - numeric range errors from [`DrawConfig::validate`]
    pub fn new(players: Vec<Player>, config: &DrawConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let groups = config.groups.clone();
        let mut labels = HashSet::new();
        for g in &groups {
            if !labels.insert(g.label.as_str()) {
                return Err(ConfigError::DuplicateGroup(g.label.clone()));
            }
            if g.capacity == 0 {
                return Err(ConfigError::Invalid(format!(
                    "group {} has zero capacity",
                    g.label
                )));
            }
            if !(1..=BRACKET_SIZE).contains(&g.bracket_position) {
                return Err(ConfigError::BracketPosition {
                    group: g.label.clone(),
                    position: g.bracket_position,
                });
            }
        }

        let mut names = HashSet::new();
        for p in &players {
            if !names.insert(p.name.as_str()) {
                return Err(ConfigError::DuplicatePlayer(p.name.clone()));
            }
        }

        let capacity: usize = groups.iter().map(|g| g.capacity).sum();
        if capacity < players.len() {
            return Err(ConfigError::CapacityShortfall {
                capacity,
                players: players.len(),
            });
        }
        if capacity > players.len() {
            warn!(
                event = "surplus_capacity",
                capacity,
                players = players.len(),
            );
        }

        let seed_slots = match &config.seed_groups {
            Some(seed_groups) => {
                check_seed_counts(&players)?;
                Some(resolve_seed_slots(seed_groups, &groups)?)
            }
            None => {
                let found = players.iter().filter(|p| p.is_seeded()).count();
                if found > 0 {
                    return Err(ConfigError::SeedCount {
                        seed: "any (no seed groups configured)".into(),
                        expected: 0,
                        found,
                    });
                }
                None
            }
        };

        let mut club_ids: HashMap<&str, usize> = HashMap::new();
        let mut club_names = Vec::new();
        let club_of = players
            .iter()
            .map(|p| {
                *club_ids.entry(p.club.as_str()).or_insert_with(|| {
                    club_names.push(p.club.clone());
                    club_names.len() - 1
                })
            })
            .collect();

        Ok(Self {
            players,
            groups,
            club_of,
            club_names,
            seed_slots,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    pub fn n_players(&self) -> usize {
        self.players.len()
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn n_clubs(&self) -> usize {
        self.club_names.len()
    }

    /// Dense club index of a player.
    pub fn club_of(&self, player: PlayerId) -> usize {
        self.club_of[player]
    }

    pub fn club_name(&self, club: usize) -> &str {
        &self.club_names[club]
    }

    pub fn seed_slots(&self) -> Option<&SeedSlots> {
        self.seed_slots.as_ref()
    }

    /// Whether local search must leave this player in place.
    pub fn is_fixed(&self, player: PlayerId) -> bool {
        self.players[player].is_seeded()
    }

    /// Players the local search may move, in roster order.
    pub fn unseeded(&self) -> impl Iterator<Item = PlayerId> + '_ {
        (0..self.players.len()).filter(move |&p| !self.is_fixed(p))
    }

    /// Players of one seed classification, in roster order.
    pub fn seeded_with(&self, seed: Seed) -> impl Iterator<Item = PlayerId> + '_ {
        (0..self.players.len()).filter(move |&p| self.players[p].seed == seed)
    }

    /// Groups a player with the given seed may occupy.
    ///
    /// Unseeded players may go anywhere.
    pub fn allowed_groups(&self, seed: Seed) -> Vec<GroupId> {
        match (seed, &self.seed_slots) {
            (Seed::None, _) | (_, None) => (0..self.groups.len()).collect(),
            (Seed::RankOne, Some(s)) => vec![s.rank_one],
            (Seed::RankTwo, Some(s)) => vec![s.rank_two],
            (Seed::PoolThreeFour, Some(s)) => s.pool_three_four.to_vec(),
            (Seed::PoolFiveEight, Some(s)) => s.pool_five_eight.to_vec(),
        }
    }

    /// True iff every hard rule holds: seeds in their allowed groups,
    /// distinct clubs per group, at most one seeded player per group.
    pub fn is_valid(&self, assignment: &Assignment) -> bool {
        self.first_violation(assignment).is_none()
    }

    /// Returns the first broken rule found, in a single pass over the roster.
    pub fn first_violation(&self, assignment: &Assignment) -> Option<Violation> {
        // stamp[club] == group + 1 marks the club as seen in `group`
        let mut stamp = vec![0usize; self.club_names.len()];

        for (group, members) in assignment.iter() {
            if members.len() > self.groups[group].capacity {
                return Some(Violation::OverCapacity { group });
            }

            let mut seeds = 0;
            for &player in members {
                let club = self.club_of[player];
                if stamp[club] == group + 1 {
                    return Some(Violation::ClubClash { group, club });
                }
                stamp[club] = group + 1;

                let seed = self.players[player].seed;
                if seed.is_seeded() {
                    seeds += 1;
                    if seeds > 1 {
                        return Some(Violation::MultipleSeeds { group });
                    }
                    if !self.seed_allows(seed, group) {
                        return Some(Violation::SeedMisplaced { player, group });
                    }
                }
            }
        }
        None
    }

    fn seed_allows(&self, seed: Seed, group: GroupId) -> bool {
        match (seed, &self.seed_slots) {
            (Seed::None, _) | (_, None) => true,
            (Seed::RankOne, Some(s)) => s.rank_one == group,
            (Seed::RankTwo, Some(s)) => s.rank_two == group,
            (Seed::PoolThreeFour, Some(s)) => s.pool_three_four.contains(&group),
            (Seed::PoolFiveEight, Some(s)) => s.pool_five_eight.contains(&group),
        }
    }
}

fn check_seed_counts(players: &[Player]) -> Result<(), ConfigError> {
    for seed in Seed::SEEDED {
        let found = players.iter().filter(|p| p.seed == seed).count();
        if found != seed.expected_count() {
            return Err(ConfigError::SeedCount {
                seed: seed.label().to_string(),
                expected: seed.expected_count(),
                found,
            });
        }
    }
    Ok(())
}

fn resolve_seed_slots(seed_groups: &SeedGroups, groups: &[Group]) -> Result<SeedSlots, ConfigError> {
    let mut used = HashSet::new();
    for label in seed_groups.labels() {
        if !used.insert(label) {
            return Err(ConfigError::SeedGroupOverlap(label.to_string()));
        }
    }

    let find = |label: &str| {
        groups
            .iter()
            .position(|g| g.label == label)
            .ok_or_else(|| ConfigError::UnknownGroup(label.to_string()))
    };

    Ok(SeedSlots {
        rank_one: find(&seed_groups.rank_one)?,
        rank_two: find(&seed_groups.rank_two)?,
        pool_three_four: [
            find(&seed_groups.pool_three_four[0])?,
            find(&seed_groups.pool_three_four[1])?,
        ],
        pool_five_eight: [
            find(&seed_groups.pool_five_eight[0])?,
            find(&seed_groups.pool_five_eight[1])?,
            find(&seed_groups.pool_five_eight[2])?,
            find(&seed_groups.pool_five_eight[3])?,
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{reference_model, reference_roster, two_club_model};

    #[test]
    fn test_reference_model_builds() {
        let model = reference_model();
        assert_eq!(model.n_players(), 34);
        assert_eq!(model.n_groups(), 11);
        assert_eq!(model.unseeded().count(), 26);
        let slots = model.seed_slots().unwrap();
        assert_eq!(slots.rank_one, 0);
        assert_eq!(slots.pool_five_eight, [4, 5, 6, 7]);
    }

    #[test]
    fn test_allowed_groups() {
        let model = reference_model();
        assert_eq!(model.allowed_groups(Seed::RankOne), vec![0]);
        assert_eq!(model.allowed_groups(Seed::RankTwo), vec![1]);
        assert_eq!(model.allowed_groups(Seed::PoolThreeFour), vec![2, 3]);
        assert_eq!(model.allowed_groups(Seed::PoolFiveEight), vec![4, 5, 6, 7]);
        assert_eq!(model.allowed_groups(Seed::None).len(), 11);
    }

    #[test]
    fn test_club_clash_detected() {
        let model = two_club_model();
        let bad = Assignment::from_groups(vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(
            model.first_violation(&bad),
            Some(Violation::ClubClash { group: 0, club: 0 })
        );
        let good = Assignment::from_groups(vec![vec![0, 2], vec![1, 3]]);
        assert!(model.is_valid(&good));
    }

    #[test]
    fn test_over_capacity_detected() {
        let model = two_club_model();
        let bad = Assignment::from_groups(vec![vec![0, 2, 1], vec![3]]);
        assert_eq!(
            model.first_violation(&bad),
            Some(Violation::OverCapacity { group: 0 })
        );
    }

    #[test]
    fn test_capacity_shortfall_rejected() {
        let config = DrawConfig::default().with_groups(vec![Group::new("A", 1, 1)]);
        let players = vec![Player::new("a", "X"), Player::new("b", "Y")];
        let err = DrawModel::new(players, &config.with_seed_groups(None)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CapacityShortfall {
                capacity: 1,
                players: 2
            }
        ));
    }

    #[test]
    fn test_seed_count_mismatch_rejected() {
        let mut roster = reference_roster();
        // demote one 5/8 seed
        let idx = roster
            .iter()
            .position(|p| p.seed == Seed::PoolFiveEight)
            .unwrap();
        roster[idx].seed = Seed::None;

        let err = DrawModel::new(roster, &DrawConfig::default()).unwrap_err();
        match err {
            ConfigError::SeedCount {
                seed,
                expected,
                found,
            } => {
                assert_eq!(seed, "5/8");
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_seeds_without_seed_groups_rejected() {
        let config = DrawConfig::default().with_seed_groups(None);
        let err = DrawModel::new(reference_roster(), &config).unwrap_err();
        assert!(matches!(err, ConfigError::SeedCount { expected: 0, .. }));
    }

    #[test]
    fn test_unknown_and_overlapping_seed_groups_rejected() {
        let mut config = DrawConfig::default();
        config.seed_groups.as_mut().unwrap().rank_two = "Z".into();
        assert!(matches!(
            DrawModel::new(reference_roster(), &config),
            Err(ConfigError::UnknownGroup(label)) if label == "Z"
        ));

        let mut config = DrawConfig::default();
        config.seed_groups.as_mut().unwrap().rank_two = "C".into();
        assert!(matches!(
            DrawModel::new(reference_roster(), &config),
            Err(ConfigError::SeedGroupOverlap(label)) if label == "C"
        ));
    }

    #[test]
    fn test_bad_bracket_position_rejected() {
        let mut config = DrawConfig::default();
        config.groups[3].bracket_position = 17;
        assert!(matches!(
            DrawModel::new(reference_roster(), &config),
            Err(ConfigError::BracketPosition { position: 17, .. })
        ));
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut roster = reference_roster();
        roster[5].name = roster[4].name.clone();
        assert!(matches!(
            DrawModel::new(roster, &DrawConfig::default()),
            Err(ConfigError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn test_misplaced_and_doubled_seeds_detected() {
        let model = reference_model();
        let top = model.seeded_with(Seed::RankOne).next().unwrap();
        let second = model.seeded_with(Seed::RankTwo).next().unwrap();

        let mut groups = vec![Vec::new(); 11];
        groups[1].push(top);
        let a = Assignment::from_groups(groups);
        assert_eq!(
            model.first_violation(&a),
            Some(Violation::SeedMisplaced { player: top, group: 1 })
        );

        let mut groups = vec![Vec::new(); 11];
        groups[0].push(top);
        groups[0].push(second);
        let a = Assignment::from_groups(groups);
        assert_eq!(
            model.first_violation(&a),
            Some(Violation::MultipleSeeds { group: 0 })
        );
    }
}
