//! Player-to-group assignment.

use super::types::{GroupId, PlayerId};

/// One complete draw: the members of every group, indexed by [`GroupId`].
///
/// Member order inside a group carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    groups: Vec<Vec<PlayerId>>,
}

impl Assignment {
    /// Creates an assignment with `n_groups` empty groups.
    pub fn empty(n_groups: usize) -> Self {
        Self {
            groups: vec![Vec::new(); n_groups],
        }
    }

    pub fn from_groups(groups: Vec<Vec<PlayerId>>) -> Self {
        Self { groups }
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn members(&self, group: GroupId) -> &[PlayerId] {
        &self.groups[group]
    }

    pub fn groups(&self) -> &[Vec<PlayerId>] {
        &self.groups
    }

    /// Iterates `(group, members)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[PlayerId])> {
        self.groups.iter().enumerate().map(|(g, m)| (g, m.as_slice()))
    }

    pub fn place(&mut self, player: PlayerId, group: GroupId) {
        self.groups[group].push(player);
    }

    /// Group currently holding `player`, if any.
    pub fn group_of(&self, player: PlayerId) -> Option<GroupId> {
        self.groups.iter().position(|m| m.contains(&player))
    }

    pub fn player_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Exchanges the members at `(group_a, slot_a)` and `(group_b, slot_b)`.
    ///
    /// Applying the same swap twice restores the original assignment.
    pub fn swap(&mut self, group_a: GroupId, slot_a: usize, group_b: GroupId, slot_b: usize) {
        debug_assert_ne!(group_a, group_b);
        let a = self.groups[group_a][slot_a];
        let b = self.groups[group_b][slot_b];
        self.groups[group_a][slot_a] = b;
        self.groups[group_b][slot_b] = a;
    }

    /// Player-to-group lookup table of length `n_players`.
    ///
    /// Unplaced players map to `None`.
    pub fn group_index(&self, n_players: usize) -> Vec<Option<GroupId>> {
        let mut index = vec![None; n_players];
        for (g, members) in self.iter() {
            for &p in members {
                index[p] = Some(g);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_is_involution() {
        let original = Assignment::from_groups(vec![vec![0, 1], vec![2, 3]]);
        let mut a = original.clone();
        a.swap(0, 1, 1, 0);
        assert_eq!(a.members(0), &[0, 2]);
        assert_eq!(a.members(1), &[1, 3]);
        a.swap(0, 1, 1, 0);
        assert_eq!(a, original);
    }

    #[test]
    fn test_group_lookup() {
        let a = Assignment::from_groups(vec![vec![3], vec![0, 2]]);
        assert_eq!(a.group_of(2), Some(1));
        assert_eq!(a.group_of(1), None);
        assert_eq!(a.group_index(4), vec![Some(1), None, Some(1), Some(0)]);
        assert_eq!(a.player_count(), 3);
    }
}
