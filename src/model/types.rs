//! Roster and layout primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Index of a player in the validated roster.
pub type PlayerId = usize;

/// Index of a group in the validated layout.
pub type GroupId = usize;

/// Pre-qualification rank of a player.
///
/// A seeded player is fixed: it is placed once by the generator and
/// never moved by local search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    #[default]
    None,
    /// Top seed. Always lands in the designated rank-one group.
    RankOne,
    /// Second seed. Always lands in the designated rank-two group.
    RankTwo,
    /// Seeds 3/4. Split across two designated groups.
    PoolThreeFour,
    /// Seeds 5/8. Split across four designated groups.
    PoolFiveEight,
}

impl Seed {
    /// All seeded classifications, in placement order.
    pub const SEEDED: [Seed; 4] = [
        Seed::RankOne,
        Seed::RankTwo,
        Seed::PoolThreeFour,
        Seed::PoolFiveEight,
    ];

    pub fn is_seeded(self) -> bool {
        !matches!(self, Seed::None)
    }

    /// Number of players a complete roster carries with this seed.
    pub fn expected_count(self) -> usize {
        match self {
            Seed::None => 0,
            Seed::RankOne | Seed::RankTwo => 1,
            Seed::PoolThreeFour => 2,
            Seed::PoolFiveEight => 4,
        }
    }

    /// Short label as printed on draw sheets (`1`, `2`, `3/4`, `5/8`).
    pub fn label(self) -> &'static str {
        match self {
            Seed::None => "",
            Seed::RankOne => "1",
            Seed::RankTwo => "2",
            Seed::PoolThreeFour => "3/4",
            Seed::PoolFiveEight => "5/8",
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Seed {
    type Err = String;

    /// Parses a draw-sheet seed label. Blank means unseeded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Seed::None),
            "1" => Ok(Seed::RankOne),
            "2" => Ok(Seed::RankTwo),
            "3/4" => Ok(Seed::PoolThreeFour),
            "5/8" => Ok(Seed::PoolFiveEight),
            other => Err(format!("unrecognized seed label '{other}'")),
        }
    }
}

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub club: String,
    #[serde(default)]
    pub seed: Seed,
}

impl Player {
    /// Club sentinel for players whose club is not known.
    ///
    /// It behaves like a regular club: two unknown-club players never
    /// share a group.
    pub const UNKNOWN_CLUB: &'static str = "UNKNOWN";

    /// Creates an unseeded player. A blank club becomes [`Self::UNKNOWN_CLUB`].
    pub fn new(name: impl Into<String>, club: impl AsRef<str>) -> Self {
        let club = club.as_ref().trim();
        Self {
            name: name.into().trim().to_string(),
            club: if club.is_empty() {
                Self::UNKNOWN_CLUB.to_string()
            } else {
                club.to_string()
            },
            seed: Seed::None,
        }
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_seeded(&self) -> bool {
        self.seed.is_seeded()
    }
}

/// Knockout bracket half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Top,
    Bottom,
}

/// Knockout bracket quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Half {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Quarter {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Number of slots in the knockout bracket that group winners feed.
pub const BRACKET_SIZE: u8 = 16;

/// A capacity-bounded group with a fixed bracket position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub capacity: usize,
    /// Position (1..=16) of the group winner in the knockout bracket.
    pub bracket_position: u8,
}

impl Group {
    pub fn new(label: impl Into<String>, capacity: usize, bracket_position: u8) -> Self {
        Self {
            label: label.into(),
            capacity,
            bracket_position,
        }
    }

    pub fn half(&self) -> Half {
        if self.bracket_position <= BRACKET_SIZE / 2 {
            Half::Top
        } else {
            Half::Bottom
        }
    }

    pub fn quarter(&self) -> Quarter {
        match self.bracket_position {
            0..=4 => Quarter::Q1,
            5..=8 => Quarter::Q2,
            9..=12 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_labels_roundtrip() {
        for seed in Seed::SEEDED {
            assert_eq!(seed.label().parse::<Seed>().unwrap(), seed);
        }
        assert_eq!("".parse::<Seed>().unwrap(), Seed::None);
        assert!("9".parse::<Seed>().is_err());
    }

    #[test]
    fn test_seed_expected_counts() {
        let total: usize = Seed::SEEDED.iter().map(|s| s.expected_count()).sum();
        assert_eq!(total, 8);
        assert!(!Seed::None.is_seeded());
    }

    #[test]
    fn test_blank_club_becomes_unknown() {
        let p = Player::new(" Ana ", "  ");
        assert_eq!(p.name, "Ana");
        assert_eq!(p.club, Player::UNKNOWN_CLUB);
    }

    #[test]
    fn test_bracket_regions() {
        let cases = [
            (1, Half::Top, Quarter::Q1),
            (4, Half::Top, Quarter::Q1),
            (5, Half::Top, Quarter::Q2),
            (8, Half::Top, Quarter::Q2),
            (9, Half::Bottom, Quarter::Q3),
            (13, Half::Bottom, Quarter::Q4),
            (16, Half::Bottom, Quarter::Q4),
        ];
        for (pos, half, quarter) in cases {
            let g = Group::new("X", 3, pos);
            assert_eq!(g.half(), half, "position {pos}");
            assert_eq!(g.quarter(), quarter, "position {pos}");
        }
    }
}
