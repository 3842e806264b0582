// =============================================================================
// Entry Conditions — binary signals thresholded from the indicator set
// =============================================================================
//
// Each signal is a yes/no read of one indicator group on one bar:
//
//   ema    EMA9 above EMA21 above SMA50 (trend stack aligned)
//   rsi    RSI sitting in the pullback band [rsi_low, rsi_high]
//   stoch  %K above %D while still below the oversold ceiling
//   vwap   close above the anchored VWAP
//   ivp    ATR percentile inside the quiet-volatility band
//   pc     volume ratio above the participation threshold
//
// Every comparison involving NaN is false, so an indicator still in warm-up
// (or undefined through a 0/0) can never activate its signal. That single
// rule replaces any per-signal missing-data handling.
// =============================================================================

use serde::{Deserialize, Serialize};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_low() -> f64 {
    35.0
}

fn default_rsi_high() -> f64 {
    50.0
}

fn default_stoch_ceiling() -> f64 {
    20.0
}

fn default_ivp_low() -> f64 {
    20.0
}

fn default_ivp_high() -> f64 {
    40.0
}

fn default_vol_ratio_min() -> f64 {
    1.2
}

/// Thresholds for the six entry conditions. All bounds are inclusive where
/// the condition uses `>=`/`<=` below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Lower bound of the RSI pullback band.
    #[serde(default = "default_rsi_low")]
    pub rsi_low: f64,

    /// Upper bound of the RSI pullback band.
    #[serde(default = "default_rsi_high")]
    pub rsi_high: f64,

    /// %K must stay below this level for the stochastic signal.
    #[serde(default = "default_stoch_ceiling")]
    pub stoch_ceiling: f64,

    /// Lower bound of the ATR-percentile quiet band.
    #[serde(default = "default_ivp_low")]
    pub ivp_low: f64,

    /// Upper bound of the ATR-percentile quiet band.
    #[serde(default = "default_ivp_high")]
    pub ivp_high: f64,

    /// Minimum volume ratio for the participation signal.
    #[serde(default = "default_vol_ratio_min")]
    pub vol_ratio_min: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_low: default_rsi_low(),
            rsi_high: default_rsi_high(),
            stoch_ceiling: default_stoch_ceiling(),
            ivp_low: default_ivp_low(),
            ivp_high: default_ivp_high(),
            vol_ratio_min: default_vol_ratio_min(),
        }
    }
}

/// One bar's worth of indicator readings, as consumed by the conditions.
/// Any field may be NaN during warm-up.
#[derive(Debug, Clone, Copy)]
pub struct BarReading {
    pub close: f64,
    pub ema9: f64,
    pub ema21: f64,
    pub sma50: f64,
    pub rsi: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub vwap: f64,
    pub atr_percentile: f64,
    pub vol_ratio: f64,
}

/// The six binary signals for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFlags {
    pub ema: bool,
    pub rsi: bool,
    pub stoch: bool,
    pub vwap: bool,
    pub ivp: bool,
    pub pc: bool,
}

impl SignalFlags {
    /// Evaluate all six conditions for one bar.
    pub fn evaluate(reading: &BarReading, thresholds: &SignalThresholds) -> Self {
        Self {
            ema: reading.ema9 > reading.ema21 && reading.ema21 > reading.sma50,
            rsi: reading.rsi >= thresholds.rsi_low && reading.rsi <= thresholds.rsi_high,
            stoch: reading.stoch_k > reading.stoch_d
                && reading.stoch_k < thresholds.stoch_ceiling,
            vwap: reading.close > reading.vwap,
            ivp: reading.atr_percentile >= thresholds.ivp_low
                && reading.atr_percentile <= thresholds.ivp_high,
            pc: reading.vol_ratio > thresholds.vol_ratio_min,
        }
    }

    pub fn none() -> Self {
        Self {
            ema: false,
            rsi: false,
            stoch: false,
            vwap: false,
            ivp: false,
            pc: false,
        }
    }

    pub fn all() -> Self {
        Self {
            ema: true,
            rsi: true,
            stoch: true,
            vwap: true,
            ivp: true,
            pc: true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// A reading with every condition satisfied under default thresholds.
    fn bullish_reading() -> BarReading {
        BarReading {
            close: 105.0,
            ema9: 103.0,
            ema21: 102.0,
            sma50: 101.0,
            rsi: 42.0,
            stoch_k: 15.0,
            stoch_d: 12.0,
            vwap: 100.0,
            atr_percentile: 30.0,
            vol_ratio: 1.5,
        }
    }

    #[test]
    fn all_conditions_active_on_bullish_reading() {
        let flags = SignalFlags::evaluate(&bullish_reading(), &SignalThresholds::default());
        assert_eq!(flags, SignalFlags::all());
    }

    #[test]
    fn ema_requires_full_stack_alignment() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();
        reading.ema21 = 100.0; // EMA21 below SMA50 breaks the stack
        let flags = SignalFlags::evaluate(&reading, &thresholds);
        assert!(!flags.ema);
    }

    #[test]
    fn rsi_band_is_inclusive_at_both_ends() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();

        reading.rsi = 35.0;
        assert!(SignalFlags::evaluate(&reading, &thresholds).rsi);
        reading.rsi = 50.0;
        assert!(SignalFlags::evaluate(&reading, &thresholds).rsi);
        reading.rsi = 34.9;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).rsi);
        reading.rsi = 50.1;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).rsi);
    }

    #[test]
    fn stoch_requires_cross_below_ceiling() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();

        reading.stoch_k = 25.0; // above the ceiling
        reading.stoch_d = 20.0;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).stoch);

        reading.stoch_k = 15.0; // below ceiling but under %D
        reading.stoch_d = 18.0;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).stoch);
    }

    #[test]
    fn ivp_band_is_inclusive() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();

        reading.atr_percentile = 20.0;
        assert!(SignalFlags::evaluate(&reading, &thresholds).ivp);
        reading.atr_percentile = 40.0;
        assert!(SignalFlags::evaluate(&reading, &thresholds).ivp);
        reading.atr_percentile = 41.0;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).ivp);
    }

    #[test]
    fn vol_ratio_threshold_is_exclusive() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();
        reading.vol_ratio = 1.2;
        assert!(!SignalFlags::evaluate(&reading, &thresholds).pc);
        reading.vol_ratio = 1.2000001;
        assert!(SignalFlags::evaluate(&reading, &thresholds).pc);
    }

    #[test]
    fn nan_inputs_never_activate() {
        let thresholds = SignalThresholds::default();
        let reading = BarReading {
            close: f64::NAN,
            ema9: f64::NAN,
            ema21: f64::NAN,
            sma50: f64::NAN,
            rsi: f64::NAN,
            stoch_k: f64::NAN,
            stoch_d: f64::NAN,
            vwap: f64::NAN,
            atr_percentile: f64::NAN,
            vol_ratio: f64::NAN,
        };
        assert_eq!(SignalFlags::evaluate(&reading, &thresholds), SignalFlags::none());
    }

    #[test]
    fn partial_nan_only_disables_affected_signals() {
        let thresholds = SignalThresholds::default();
        let mut reading = bullish_reading();
        reading.sma50 = f64::NAN; // 50-bar warm-up outlasts the others
        let flags = SignalFlags::evaluate(&reading, &thresholds);
        assert!(!flags.ema);
        assert!(flags.rsi);
        assert!(flags.vwap);
    }

    #[test]
    fn thresholds_deserialise_with_defaults() {
        let t: SignalThresholds = serde_json::from_str("{}").unwrap();
        assert_eq!(t, SignalThresholds::default());
        let t: SignalThresholds = serde_json::from_str(r#"{ "rsi_low": 30.0 }"#).unwrap();
        assert_eq!(t.rsi_low, 30.0);
        assert_eq!(t.rsi_high, 50.0);
    }
}
