//! Repetition penalty.

use serde::Serialize;

use super::weights::PenaltyWeights;
use crate::history::{visit_subsets, HistoryStore, Subset};
use crate::model::{Assignment, DrawModel};

/// Named contributions to a draw's penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PenaltyBreakdown {
    /// Sum of past visits of each player to its current group.
    pub group_repetition: f64,
    /// Sum of squared past co-occurrence counts of co-located pairs.
    pub pair: f64,
    pub triple: f64,
    pub quad: f64,
    /// Weighted surplus same-club occupants per bracket half.
    pub half_clustering: f64,
    /// Weighted surplus same-club occupants per bracket quarter.
    pub quarter_clustering: f64,
    pub total: f64,
}

/// Scores assignments against a history snapshot.
///
/// Pure: the same assignment and history always produce the same
/// breakdown.
#[derive(Debug, Clone, Copy)]
pub struct PenaltyEvaluator<'a> {
    model: &'a DrawModel,
    history: &'a HistoryStore,
    weights: PenaltyWeights,
}

impl<'a> PenaltyEvaluator<'a> {
    pub fn new(model: &'a DrawModel, history: &'a HistoryStore, weights: PenaltyWeights) -> Self {
        Self {
            model,
            history,
            weights,
        }
    }

    /// Total penalty. Lower is better.
    pub fn score(&self, assignment: &Assignment) -> f64 {
        self.breakdown(assignment).total
    }

    pub fn breakdown(&self, assignment: &Assignment) -> PenaltyBreakdown {
        let w = &self.weights;
        let h = self.history;

        let mut group_repetition = 0u64;
        let mut pair_sq = 0u64;
        let mut triple = 0u64;
        let mut quad = 0u64;

        for (g, members) in assignment.iter() {
            for &p in members {
                group_repetition += u64::from(h.group_count(p, g));
            }
            visit_subsets(members, |subset| match subset {
                Subset::Pair(k) => pair_sq += u64::from(h.pair_key(&k)).pow(2),
                Subset::Triple(k) => triple += u64::from(h.triple_key(&k)),
                Subset::Quad(k) => quad += u64::from(h.quad_key(&k)),
            });
        }

        let (half_surplus, quarter_surplus) = self.club_clustering(assignment);

        let mut b = PenaltyBreakdown {
            group_repetition: group_repetition as f64,
            pair: w.pair * pair_sq as f64,
            triple: w.triple * triple as f64,
            quad: w.quad * quad as f64,
            half_clustering: w.half * half_surplus as f64,
            quarter_clustering: w.quarter * quarter_surplus as f64,
            total: 0.0,
        };
        b.total = b.group_repetition
            + b.pair
            + b.triple
            + b.quad
            + b.half_clustering
            + b.quarter_clustering;
        b
    }

    /// Surplus same-club occupants per bracket half and quarter:
    /// for each club and section, `max(0, occupants - 1)`.
    fn club_clustering(&self, assignment: &Assignment) -> (u32, u32) {
        let n_clubs = self.model.n_clubs();
        let mut halves = vec![[0u32; 2]; n_clubs];
        let mut quarters = vec![[0u32; 4]; n_clubs];

        for (g, members) in assignment.iter() {
            let group = self.model.group(g);
            let (half, quarter) = (group.half().index(), group.quarter().index());
            for &p in members {
                let club = self.model.club_of(p);
                halves[club][half] += 1;
                quarters[club][quarter] += 1;
            }
        }

        let surplus = |c: &u32| c.saturating_sub(1);
        let half: u32 = halves.iter().flatten().map(surplus).sum();
        let quarter: u32 = quarters.iter().flatten().map(surplus).sum();
        (half, quarter)
    }
}
