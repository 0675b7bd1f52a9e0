//! Pairwise-swap neighborhood.

use rand::Rng;

use crate::model::{Assignment, DrawModel, GroupId};

/// Exchange of two unseeded players across two distinct groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub group_a: GroupId,
    pub slot_a: usize,
    pub group_b: GroupId,
    pub slot_b: usize,
}

impl Swap {
    /// Applies the swap in place. Applying it again undoes it.
    pub fn apply(&self, assignment: &mut Assignment) {
        assignment.swap(self.group_a, self.slot_a, self.group_b, self.slot_b);
    }
}

/// Proposes random swaps that never touch seeded players.
#[derive(Debug, Clone)]
pub struct NeighborGenerator<'a> {
    model: &'a DrawModel,
    max_attempts: usize,
}

impl<'a> NeighborGenerator<'a> {
    pub fn new(model: &'a DrawModel) -> Self {
        Self {
            model,
            max_attempts: 200,
        }
    }

    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Picks two distinct groups and one movable member of each.
    ///
    /// Returns `None` when no pair of groups with movable members was
    /// hit within the attempt bound. Callers treat that as "no move".
    pub fn propose<R: Rng + ?Sized>(&self, assignment: &Assignment, rng: &mut R) -> Option<Swap> {
        let n = assignment.n_groups();
        if n < 2 {
            return None;
        }

        for _ in 0..self.max_attempts {
            let group_a = rng.random_range(0..n);
            let mut group_b = rng.random_range(0..n - 1);
            if group_b >= group_a {
                group_b += 1;
            }

            let movable_a = self.movable_slots(assignment, group_a);
            let movable_b = self.movable_slots(assignment, group_b);
            if movable_a.is_empty() || movable_b.is_empty() {
                continue;
            }

            return Some(Swap {
                group_a,
                slot_a: movable_a[rng.random_range(0..movable_a.len())],
                group_b,
                slot_b: movable_b[rng.random_range(0..movable_b.len())],
            });
        }
        None
    }

    /// Returns a copy of `assignment` with one proposed swap applied.
    pub fn neighbor<R: Rng + ?Sized>(
        &self,
        assignment: &Assignment,
        rng: &mut R,
    ) -> Option<Assignment> {
        let swap = self.propose(assignment, rng)?;
        let mut candidate = assignment.clone();
        swap.apply(&mut candidate);
        Some(candidate)
    }

    fn movable_slots(&self, assignment: &Assignment, group: GroupId) -> Vec<usize> {
        assignment
            .members(group)
            .iter()
            .enumerate()
            .filter(|&(_, &p)| !self.model.is_fixed(p))
            .map(|(slot, _)| slot)
            .collect()
    }
}
