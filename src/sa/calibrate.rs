//! Empirical temperature calibration.
//!
//! Samples positive cost deltas along a soft random walk and derives a
//! starting temperature at which the median worsening move is accepted
//! with a target probability, then a geometric cooling rate reaching
//! `t_end` after the iteration budget:
//!
//! ```text
//! t_start      = factor * median / ln(1 / (1 - p_target))
//! cooling_rate = max(min_cooling, (t_end / t_start) ^ (1 / max_iterations))
//! ```

use rand::Rng;
use tracing::{info, warn};

use super::config::{AnnealConfig, CalibrationConfig};
use super::types::AnnealProblem;

/// Outcome of a calibration pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// A schedule was derived from `samples` positive deltas.
    Calibrated {
        t_start: f64,
        cooling_rate: f64,
        median_delta: f64,
        samples: usize,
    },
    /// No worsening move was ever observed; keep the configured schedule.
    NoSignal,
}

impl Calibration {
    /// Returns `config` with the calibrated schedule, or unchanged on
    /// [`Calibration::NoSignal`].
    pub fn apply(&self, config: &AnnealConfig) -> AnnealConfig {
        match *self {
            Calibration::Calibrated {
                t_start,
                cooling_rate,
                ..
            } => config.with_t_start(t_start).with_cooling_rate(cooling_rate),
            Calibration::NoSignal => *config,
        }
    }
}

/// Short-run statistics at a fixed starting temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// Fraction of worsening moves that were accepted.
    pub worse_acceptance: f64,
    /// Lowest cost seen.
    pub best_cost: f64,
}

/// Derives annealing schedules from sampled cost deltas.
pub struct Calibrator;

impl Calibrator {
    /// Samples positive deltas from a fresh starting solution and derives
    /// a schedule for `anneal`.
    ///
    /// Tries at most `10 * samples` moves. Infeasible and idle moves are
    /// discarded. The walk accepts improving moves always and other moves
    /// with probability 0.5, whether or not they were sampled.
    ///
    /// # Errors
    ///
    /// Propagates the problem's failure to build a starting solution.
    pub fn calibrate<P, R>(
        problem: &P,
        calibration: &CalibrationConfig,
        anneal: &AnnealConfig,
        rng: &mut R,
    ) -> Result<Calibration, P::Error>
    where
        P: AnnealProblem,
        R: Rng + ?Sized,
    {
        let mut current = problem.initial_solution(rng)?;
        let mut current_cost = problem.cost(&current);

        let mut deltas = Vec::with_capacity(calibration.samples);
        let max_attempts = calibration.samples * 10;
        let mut attempts = 0;

        while deltas.len() < calibration.samples && attempts < max_attempts {
            attempts += 1;

            let Some(candidate) = problem.neighbor(&current, rng) else {
                continue;
            };
            if !problem.is_feasible(&candidate) {
                continue;
            }

            let candidate_cost = problem.cost(&candidate);
            let delta = candidate_cost - current_cost;
            if delta > 0.0 {
                deltas.push(delta);
            }
            if delta < 0.0 || rng.random_range(0.0..1.0) < 0.5 {
                current = candidate;
                current_cost = candidate_cost;
            }
        }

        let found = Self::suggest(&deltas, calibration, anneal).unwrap_or(Calibration::NoSignal);
        match found {
            Calibration::Calibrated {
                t_start,
                cooling_rate,
                median_delta,
                samples,
            } => info!(
                event = "calibration_result",
                samples,
                attempts,
                median_delta,
                p_target = calibration.p_target,
                t_start,
                cooling_rate,
            ),
            Calibration::NoSignal => warn!(
                event = "calibration_no_signal",
                attempts,
                t_start = anneal.t_start,
                cooling_rate = anneal.cooling_rate,
            ),
        }
        Ok(found)
    }

    /// Derives a schedule from positive deltas. `None` if `deltas` is empty.
    ///
    /// The cooling rate never exceeds 1, so a starting temperature below
    /// `t_end` holds steady instead of heating up.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_draw::sa::{AnnealConfig, CalibrationConfig, Calibration, Calibrator};
    ///
    /// let found = Calibrator::suggest(
    ///     &[1.0, 2.0, 3.0, 4.0, 5.0],
    ///     &CalibrationConfig::default(),
    ///     &AnnealConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// let Calibration::Calibrated { t_start, median_delta, .. } = found else {
    ///     unreachable!()
    /// };
    /// assert_eq!(median_delta, 3.0);
    /// assert!((t_start - 4.0 * 3.0 / (1.0f64 / 0.3).ln()).abs() < 1e-9);
    /// ```
    pub fn suggest(
        deltas: &[f64],
        calibration: &CalibrationConfig,
        anneal: &AnnealConfig,
    ) -> Option<Calibration> {
        let median_delta = median(deltas)?;

        let t_start =
            calibration.factor * median_delta / (1.0 / (1.0 - calibration.p_target)).ln();
        let iterations = anneal.max_iterations.max(1) as f64;
        let cooling_rate = (anneal.t_end / t_start)
            .powf(1.0 / iterations)
            .max(calibration.min_cooling)
            .min(1.0);

        Some(Calibration::Calibrated {
            t_start,
            cooling_rate,
            median_delta,
            samples: deltas.len(),
        })
    }

    /// Runs a short annealing pass at `t_start` (cooling by 0.99 per
    /// evaluated move) and reports how often worsening moves were taken.
    ///
    /// Useful to compare candidate starting temperatures by hand.
    pub fn probe<P, R>(
        problem: &P,
        t_start: f64,
        iterations: usize,
        rng: &mut R,
    ) -> Result<ProbeResult, P::Error>
    where
        P: AnnealProblem,
        R: Rng + ?Sized,
    {
        let mut current = problem.initial_solution(rng)?;
        let mut current_cost = problem.cost(&current);
        let mut best_cost = current_cost;
        let mut temperature = t_start;
        let mut worse_moves = 0usize;
        let mut accepted_worse = 0usize;

        for _ in 0..iterations {
            let Some(candidate) = problem.neighbor(&current, rng) else {
                continue;
            };
            if !problem.is_feasible(&candidate) {
                continue;
            }

            let candidate_cost = problem.cost(&candidate);
            let delta = candidate_cost - current_cost;
            let accept = if delta < 0.0 {
                true
            } else {
                let taken = rng.random_range(0.0..1.0) < (-delta / temperature).exp();
                if delta > 0.0 {
                    worse_moves += 1;
                    accepted_worse += usize::from(taken);
                }
                taken
            };

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                best_cost = best_cost.min(current_cost);
            }
            temperature *= 0.99;
        }

        Ok(ProbeResult {
            worse_acceptance: if worse_moves > 0 {
                accepted_worse as f64 / worse_moves as f64
            } else {
                0.0
            },
            best_cost,
        })
    }
}

/// Median of `values`; the mean of the two middle values for even
/// lengths. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::convert::Infallible;

    /// Random walk on integers with cost |x|.
    struct Walk;

    impl AnnealProblem for Walk {
        type Solution = i64;
        type Error = Infallible;

        fn initial_solution<R: Rng + ?Sized>(&self, _rng: &mut R) -> Result<i64, Infallible> {
            Ok(10)
        }

        fn neighbor<R: Rng + ?Sized>(&self, x: &i64, rng: &mut R) -> Option<i64> {
            Some(if rng.random_range(0..2) == 0 { x - 1 } else { x + 1 })
        }

        fn is_feasible(&self, _x: &i64) -> bool {
            true
        }

        fn cost(&self, x: &i64) -> f64 {
            (*x as f64).abs()
        }
    }

    /// Flat landscape: every delta is zero.
    struct Flat;

    impl AnnealProblem for Flat {
        type Solution = i64;
        type Error = Infallible;

        fn initial_solution<R: Rng + ?Sized>(&self, _rng: &mut R) -> Result<i64, Infallible> {
            Ok(0)
        }

        fn neighbor<R: Rng + ?Sized>(&self, x: &i64, _rng: &mut R) -> Option<i64> {
            Some(x + 1)
        }

        fn is_feasible(&self, _x: &i64) -> bool {
            true
        }

        fn cost(&self, _x: &i64) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_suggest_formula() {
        let calibration = CalibrationConfig::default()
            .with_p_target(0.7)
            .with_factor(4.0);
        let anneal = AnnealConfig::default();
        let found = Calibrator::suggest(&[1.0, 2.0, 3.0, 4.0, 5.0], &calibration, &anneal).unwrap();

        let Calibration::Calibrated {
            t_start,
            cooling_rate,
            median_delta,
            samples,
        } = found
        else {
            panic!("expected a calibrated schedule");
        };
        let expected = 4.0 * 3.0 / (1.0f64 / 0.3).ln();
        assert!((t_start - expected).abs() < 1e-9);
        assert_eq!(median_delta, 3.0);
        assert_eq!(samples, 5);

        let raw = (anneal.t_end / expected).powf(1.0 / 200.0);
        assert!((cooling_rate - raw.max(0.985)).abs() < 1e-12);
    }

    #[test]
    fn test_suggest_cooling_respects_min_cooling() {
        let calibration = CalibrationConfig::default().with_min_cooling(0.999);
        let anneal = AnnealConfig::default().with_max_iterations(10);
        let Some(Calibration::Calibrated { cooling_rate, .. }) =
            Calibrator::suggest(&[2.0], &calibration, &anneal)
        else {
            panic!("expected a calibrated schedule");
        };
        assert!((cooling_rate - 0.999).abs() < 1e-12);
    }

    #[test]
    fn test_suggest_cooling_never_heats() {
        let calibration = CalibrationConfig::default();
        // tiny deltas put t_start below t_end
        let anneal = AnnealConfig::default().with_t_end(1.0);
        let Some(Calibration::Calibrated { cooling_rate, .. }) =
            Calibrator::suggest(&[1e-6], &calibration, &anneal)
        else {
            panic!("expected a calibrated schedule");
        };
        assert!(cooling_rate <= 1.0);
    }

    #[test]
    fn test_calibrate_collects_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let calibration = CalibrationConfig::default().with_samples(50);
        let found =
            Calibrator::calibrate(&Walk, &calibration, &AnnealConfig::default(), &mut rng).unwrap();

        match found {
            Calibration::Calibrated {
                samples,
                median_delta,
                t_start,
                ..
            } => {
                assert_eq!(samples, 50);
                assert_eq!(median_delta, 1.0);
                assert!(t_start > 0.0);
            }
            Calibration::NoSignal => panic!("walk has positive deltas"),
        }
    }

    #[test]
    fn test_no_signal_keeps_schedule() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let anneal = AnnealConfig::default().with_t_start(3.0);
        let found =
            Calibrator::calibrate(&Flat, &CalibrationConfig::default(), &anneal, &mut rng).unwrap();

        assert_eq!(found, Calibration::NoSignal);
        assert_eq!(found.apply(&anneal), anneal);
    }

    #[test]
    fn test_apply_replaces_schedule() {
        let anneal = AnnealConfig::default();
        let calibrated = Calibration::Calibrated {
            t_start: 9.0,
            cooling_rate: 0.99,
            median_delta: 1.0,
            samples: 1,
        }
        .apply(&anneal);
        assert_eq!(calibrated.t_start, 9.0);
        assert_eq!(calibrated.cooling_rate, 0.99);
        assert_eq!(calibrated.max_iterations, anneal.max_iterations);
    }

    #[test]
    fn test_probe_acceptance_grows_with_temperature() {
        let cold = Calibrator::probe(&Walk, 0.05, 200, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let hot = Calibrator::probe(&Walk, 50.0, 200, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

        assert!(cold.worse_acceptance < hot.worse_acceptance);
        assert!(hot.worse_acceptance > 0.5);
        assert!(cold.best_cost <= 10.0);
    }
}
