// =============================================================================
// Weighted Timing Score
// =============================================================================
//
// The composite score is a weighted sum of the six binary entry conditions,
// scaled to 0–100:
//
//   Timing_Score = 100 * (w_ema*ema + w_rsi*rsi + w_stoch*stoch
//                         + w_vwap*vwap + w_ivp*ivp + w_pc*pc)
//
// The weights are configuration, not constants: they live in the runtime
// config, deserialise with the reference defaults, and are validated to sum
// to 1.0 so the score stays on the 0–100 scale.
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signals::conditions::SignalFlags;
use crate::types::TradeSignal;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_w_ema() -> f64 {
    0.3
}

fn default_w_rsi() -> f64 {
    0.2
}

fn default_w_stoch() -> f64 {
    0.2
}

fn default_w_vwap() -> f64 {
    0.1
}

fn default_w_ivp() -> f64 {
    0.1
}

fn default_w_pc() -> f64 {
    0.1
}

fn default_buy_call_percentile() -> f64 {
    80.0
}

fn default_hold_percentile() -> f64 {
    50.0
}

/// Error raised when a weight set does not sum to 1.0.
#[derive(Debug, Error)]
#[error("signal weights sum to {sum}, expected 1.0")]
pub struct WeightError {
    pub sum: f64,
}

/// Per-signal weights of the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_w_ema")]
    pub ema: f64,
    #[serde(default = "default_w_rsi")]
    pub rsi: f64,
    #[serde(default = "default_w_stoch")]
    pub stoch: f64,
    #[serde(default = "default_w_vwap")]
    pub vwap: f64,
    #[serde(default = "default_w_ivp")]
    pub ivp: f64,
    #[serde(default = "default_w_pc")]
    pub pc: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ema: default_w_ema(),
            rsi: default_w_rsi(),
            stoch: default_w_stoch(),
            vwap: default_w_vwap(),
            ivp: default_w_ivp(),
            pc: default_w_pc(),
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.ema + self.rsi + self.stoch + self.vwap + self.ivp + self.pc
    }

    /// Check that the weights sum to 1.0 (within float tolerance), keeping
    /// the composite on the 0–100 scale.
    pub fn validate(&self) -> Result<(), WeightError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(WeightError { sum });
        }
        Ok(())
    }

    /// Weighted composite of one bar's flags, scaled to 0–100.
    pub fn score(&self, flags: &SignalFlags) -> f64 {
        let mut total = 0.0;
        if flags.ema {
            total += self.ema;
        }
        if flags.rsi {
            total += self.rsi;
        }
        if flags.stoch {
            total += self.stoch;
        }
        if flags.vwap {
            total += self.vwap;
        }
        if flags.ivp {
            total += self.ivp;
        }
        if flags.pc {
            total += self.pc;
        }
        total * 100.0
    }
}

/// Percentile bands mapping the latest bar's score percentile to a trade
/// classification. Both boundaries are inclusive on entry to the higher band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBands {
    #[serde(default = "default_buy_call_percentile")]
    pub buy_call_percentile: f64,

    #[serde(default = "default_hold_percentile")]
    pub hold_percentile: f64,
}

impl Default for TradeBands {
    fn default() -> Self {
        Self {
            buy_call_percentile: default_buy_call_percentile(),
            hold_percentile: default_hold_percentile(),
        }
    }
}

impl TradeBands {
    pub fn classify(&self, percentile: f64) -> TradeSignal {
        if percentile >= self.buy_call_percentile {
            TradeSignal::BuyCall
        } else if percentile >= self.hold_percentile {
            TradeSignal::Hold
        } else {
            TradeSignal::Avoid
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!(ScoreWeights::default().validate().is_ok());
    }

    #[test]
    fn skewed_weights_rejected() {
        let mut weights = ScoreWeights::default();
        weights.ema = 0.5;
        let err = weights.validate().unwrap_err();
        assert!((err.sum - 1.2).abs() < 1e-9);
    }

    #[test]
    fn all_signals_true_scores_exactly_100() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.score(&SignalFlags::all()), 100.0);
    }

    #[test]
    fn all_signals_false_scores_exactly_0() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.score(&SignalFlags::none()), 0.0);
    }

    #[test]
    fn single_signal_scores_its_weight() {
        let weights = ScoreWeights::default();
        let mut flags = SignalFlags::none();
        flags.ema = true;
        assert!((weights.score(&flags) - 30.0).abs() < 1e-12);

        let mut flags = SignalFlags::none();
        flags.vwap = true;
        assert!((weights.score(&flags) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn classification_boundaries_are_inclusive() {
        let bands = TradeBands::default();
        assert_eq!(bands.classify(80.0), crate::types::TradeSignal::BuyCall);
        assert_eq!(bands.classify(79.9), crate::types::TradeSignal::Hold);
        assert_eq!(bands.classify(50.0), crate::types::TradeSignal::Hold);
        assert_eq!(bands.classify(49.9), crate::types::TradeSignal::Avoid);
        assert_eq!(bands.classify(100.0), crate::types::TradeSignal::BuyCall);
        assert_eq!(bands.classify(0.0), crate::types::TradeSignal::Avoid);
    }

    #[test]
    fn weights_deserialise_with_defaults() {
        let w: ScoreWeights = serde_json::from_str("{}").unwrap();
        assert_eq!(w, ScoreWeights::default());
        let w: ScoreWeights = serde_json::from_str(r#"{ "ema": 0.4 }"#).unwrap();
        assert_eq!(w.ema, 0.4);
        assert_eq!(w.rsi, 0.2);
    }
}
