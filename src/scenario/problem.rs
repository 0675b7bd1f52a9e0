//! Draw optimization as an annealing problem.

use rand::Rng;

use crate::config::DrawConfig;
use crate::draw::{FeasibleGenerator, NeighborGenerator};
use crate::error::DrawError;
use crate::history::HistoryStore;
use crate::model::{Assignment, DrawModel};
use crate::penalty::PenaltyEvaluator;
use crate::sa::AnnealProblem;

/// One run's view of the draw: model, frozen history and weights.
///
/// The history is borrowed immutably for the duration of a run; it is
/// only updated between runs.
#[derive(Debug, Clone)]
pub struct DrawProblem<'a> {
    model: &'a DrawModel,
    generator: FeasibleGenerator<'a>,
    neighbors: NeighborGenerator<'a>,
    evaluator: PenaltyEvaluator<'a>,
}

impl<'a> DrawProblem<'a> {
    pub fn new(model: &'a DrawModel, history: &'a HistoryStore, config: &DrawConfig) -> Self {
        Self {
            model,
            generator: FeasibleGenerator::new(model)
                .with_max_attempts(config.max_generation_attempts),
            neighbors: NeighborGenerator::new(model)
                .with_max_attempts(config.max_neighbor_attempts),
            evaluator: PenaltyEvaluator::new(model, history, config.weights),
        }
    }

    pub fn evaluator(&self) -> &PenaltyEvaluator<'a> {
        &self.evaluator
    }
}

impl AnnealProblem for DrawProblem<'_> {
    type Solution = Assignment;
    type Error = DrawError;

    fn initial_solution<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Assignment, DrawError> {
        self.generator.generate(rng)
    }

    fn neighbor<R: Rng + ?Sized>(&self, solution: &Assignment, rng: &mut R) -> Option<Assignment> {
        self.neighbors.neighbor(solution, rng)
    }

    fn is_feasible(&self, solution: &Assignment) -> bool {
        self.model.is_valid(solution)
    }

    fn cost(&self, solution: &Assignment) -> f64 {
        self.evaluator.score(solution)
    }
}
