//! Core trait for annealing.

use rand::Rng;

/// Defines a constrained annealing problem.
///
/// The problem supplies a feasible starting point, a perturbation, a
/// feasibility test and a cost. The runner handles temperature,
/// acceptance and bookkeeping.
///
/// # Minimization
///
/// The runner minimizes [`cost`](Self::cost).
///
/// # Examples
///
/// ```ignore
/// struct Parity;
///
/// impl AnnealProblem for Parity {
///     type Solution = i64;
///     type Error = std::convert::Infallible;
///
///     fn initial_solution<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<i64, Self::Error> {
///         Ok(rng.random_range(-50..50) * 2)
///     }
///
///     fn neighbor<R: Rng + ?Sized>(&self, x: &i64, rng: &mut R) -> Option<i64> {
///         Some(x + rng.random_range(-2..=2))
///     }
///
///     fn is_feasible(&self, x: &i64) -> bool {
///         x % 2 == 0
///     }
///
///     fn cost(&self, x: &i64) -> f64 {
///         (*x as f64).abs()
///     }
/// }
/// ```
pub trait AnnealProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Failure to produce a starting point.
    type Error;

    /// Creates a feasible starting solution.
    fn initial_solution<R: Rng + ?Sized>(&self, rng: &mut R)
        -> Result<Self::Solution, Self::Error>;

    /// Proposes a candidate close to `solution`.
    ///
    /// `None` means no move could be formed; the runner counts the
    /// iteration as idle.
    fn neighbor<R: Rng + ?Sized>(
        &self,
        solution: &Self::Solution,
        rng: &mut R,
    ) -> Option<Self::Solution>;

    /// Whether a candidate respects every hard rule.
    fn is_feasible(&self, solution: &Self::Solution) -> bool;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;
}
