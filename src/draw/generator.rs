//! Feasible assignment generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::DrawError;
use crate::model::{Assignment, DrawModel, GroupId, PlayerId, Seed};

/// Builds valid assignments from scratch.
///
/// Seeded players are placed first (rank one and rank two
/// deterministically, pool seeds over a random permutation of their
/// designated groups). The open slots are then filled by shuffling the
/// unseeded players until the club rule holds, up to `max_attempts`
/// times.
#[derive(Debug, Clone)]
pub struct FeasibleGenerator<'a> {
    model: &'a DrawModel,
    max_attempts: usize,
}

impl<'a> FeasibleGenerator<'a> {
    pub fn new(model: &'a DrawModel) -> Self {
        Self {
            model,
            max_attempts: 5000,
        }
    }

    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Returns a valid assignment.
    ///
    /// # Errors
    ///
    /// [`DrawError::FeasibleAssignmentNotFound`] once the retry bound is
    /// exhausted. This signals a contended layout and must reach the caller.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Assignment, DrawError> {
        let base = self.place_seeds(rng);

        let mut slots: Vec<GroupId> = Vec::new();
        for (g, group) in self.model.groups().iter().enumerate() {
            let free = group.capacity.saturating_sub(base.members(g).len());
            slots.extend(std::iter::repeat(g).take(free));
        }
        let mut unseeded: Vec<PlayerId> = self.model.unseeded().collect();

        for _ in 0..self.max_attempts {
            unseeded.shuffle(rng);
            slots.shuffle(rng);

            let mut assignment = base.clone();
            for (&player, &group) in unseeded.iter().zip(&slots) {
                assignment.place(player, group);
            }

            if self.model.is_valid(&assignment) {
                return Ok(assignment);
            }
        }

        Err(DrawError::FeasibleAssignmentNotFound {
            attempts: self.max_attempts,
        })
    }

    fn place_seeds<R: Rng + ?Sized>(&self, rng: &mut R) -> Assignment {
        let mut assignment = Assignment::empty(self.model.n_groups());
        let Some(slots) = self.model.seed_slots() else {
            return assignment;
        };

        for p in self.model.seeded_with(Seed::RankOne) {
            assignment.place(p, slots.rank_one);
        }
        for p in self.model.seeded_with(Seed::RankTwo) {
            assignment.place(p, slots.rank_two);
        }

        // pool groups are interchangeable, so the permutation is the tie-break
        let mut three_four = slots.pool_three_four;
        three_four.shuffle(rng);
        for (p, g) in self.model.seeded_with(Seed::PoolThreeFour).zip(three_four) {
            assignment.place(p, g);
        }

        let mut five_eight = slots.pool_five_eight;
        five_eight.shuffle(rng);
        for (p, g) in self.model.seeded_with(Seed::PoolFiveEight).zip(five_eight) {
            assignment.place(p, g);
        }

        assignment
    }
}
