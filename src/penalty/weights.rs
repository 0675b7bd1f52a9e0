//! Penalty weights.

use serde::{Deserialize, Serialize};

/// Multipliers for the penalty terms.
///
/// Group revisits always count with weight 1. The pair term squares the
/// pair count before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub pair: f64,
    pub triple: f64,
    pub quad: f64,
    /// Per surplus same-club occupant of a bracket half.
    pub half: f64,
    /// Per surplus same-club occupant of a bracket quarter.
    pub quarter: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            pair: 1.0,
            triple: 1.0,
            quad: 0.5,
            half: 0.05,
            quarter: 0.03,
        }
    }
}

impl PenaltyWeights {
    pub fn with_pair(mut self, w: f64) -> Self {
        self.pair = w;
        self
    }

    pub fn with_triple(mut self, w: f64) -> Self {
        self.triple = w;
        self
    }

    pub fn with_quad(mut self, w: f64) -> Self {
        self.quad = w;
        self
    }

    pub fn with_half(mut self, w: f64) -> Self {
        self.half = w;
        self
    }

    pub fn with_quarter(mut self, w: f64) -> Self {
        self.quarter = w;
        self
    }

    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("pair", self.pair),
            ("triple", self.triple),
            ("quad", self.quad),
            ("half", self.half),
            ("quarter", self.quarter),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("{name} weight must be finite and >= 0, got {w}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = PenaltyWeights::default();
        assert!((w.quad - 0.5).abs() < 1e-12);
        assert!((w.half - 0.05).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(PenaltyWeights::default().with_triple(-1.0).validate().is_err());
        assert!(PenaltyWeights::default().with_half(f64::NAN).validate().is_err());
    }
}
