//! Draw domain model.
//!
//! Players, groups and assignments, plus [`DrawModel`]: the validated
//! roster/layout pair that owns the hard placement rules.
//!
//! # Rules
//!
//! - seeded players sit in their designated groups (rank one and rank
//!   two in fixed singletons, pool seeds spread one per designated group)
//! - no group holds two players from the same club
//! - no group holds more than one seeded player

mod assignment;
mod constraints;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use assignment::Assignment;
pub use constraints::{DrawModel, SeedSlots, Violation};
pub use types::{Group, GroupId, Half, Player, PlayerId, Quarter, Seed, BRACKET_SIZE};
