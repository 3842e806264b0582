// =============================================================================
// Scoring Pipeline — indicators -> signals -> composite score -> percentile
// =============================================================================
//
// One pure batch transform over a daily series:
//
//   1. Derive the indicator set (EMA stack, RSI, stochastic, VWAP, ATR
//      percentile, volume ratio), each aligned with the bars.
//   2. Threshold the six binary entry conditions per bar.
//   3. Combine them into the weighted 0–100 timing score.
//   4. Rank the score series into a percentile (global or causal).
//   5. Classify the most recent bar into Buy Call / Hold / Avoid.
//
// The transform holds no state and touches nothing outside its inputs, so
// recomputing on identical input yields bit-identical output. Insufficient
// history is not an error: indicators stay NaN through their warm-up and the
// affected signals simply read inactive. The only failure is an empty series.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::indicators::{atr, ema, rsi, stochastic, volume, vwap};
use crate::runtime_config::ScoringConfig;
use crate::series::DailySeries;
use crate::signals::conditions::{BarReading, SignalFlags};
use crate::stats::{causal_percentile_rank, percentile_rank, rolling_mean};
use crate::types::{RankMode, TradeSignal};

// ── Lookback windows ─────────────────────────────────────────────────────────
// Fixed by the score definition; the tunables (thresholds, weights, bands)
// live in `ScoringConfig`.

const EMA_FAST_SPAN: usize = 9;
const EMA_SLOW_SPAN: usize = 21;
const SMA_TREND_WINDOW: usize = 50;
const RSI_PERIOD: usize = 7;
const STOCH_K_WINDOW: usize = 14;
const STOCH_D_WINDOW: usize = 3;
const ATR_PERIOD: usize = 14;
const VOLUME_WINDOW: usize = 20;

/// Error raised by [`compute`].
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("no bars to score")]
    NoData,
}

/// The full derived indicator set, every series aligned with the input bars.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSet {
    pub ema9: Vec<f64>,
    pub ema21: Vec<f64>,
    pub sma50: Vec<f64>,
    pub rsi: Vec<f64>,
    pub stoch_k: Vec<f64>,
    pub stoch_d: Vec<f64>,
    pub vwap: Vec<f64>,
    pub atr: Vec<f64>,
    pub atr_percentile: Vec<f64>,
    pub vol_ratio: Vec<f64>,
}

/// Derive all indicators for the series in one pass.
pub fn compute_indicators(series: &DailySeries) -> IndicatorSet {
    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();
    let volumes = series.volumes();

    let stoch = stochastic::stochastic(&highs, &lows, &closes, STOCH_K_WINDOW, STOCH_D_WINDOW);
    let atr_series = atr::atr(&highs, &lows, &closes, ATR_PERIOD);
    let atr_pct = atr::atr_percentile(&atr_series);

    IndicatorSet {
        ema9: ema::ema(&closes, EMA_FAST_SPAN),
        ema21: ema::ema(&closes, EMA_SLOW_SPAN),
        sma50: rolling_mean(&closes, SMA_TREND_WINDOW),
        rsi: rsi::rsi(&closes, RSI_PERIOD),
        stoch_k: stoch.k,
        stoch_d: stoch.d,
        vwap: vwap::vwap(&closes, &volumes),
        atr: atr_series,
        atr_percentile: atr_pct,
        vol_ratio: volume::volume_ratio(&volumes, VOLUME_WINDOW),
    }
}

/// One scored row of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBar {
    pub date: NaiveDate,
    pub close: f64,
    pub timing_score: f64,
    pub percentile: f64,
    pub signals: SignalFlags,
}

/// The most recent bar's reading, as displayed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub date: NaiveDate,
    pub timing_score: f64,
    pub percentile: f64,
    pub signal: TradeSignal,
}

/// The scored history for one symbol: a per-date table plus the latest-bar
/// summary. Serialisable as-is for the dashboard API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSeries {
    pub rows: Vec<ScoredBar>,
    pub latest: LatestReading,
}

/// Score a daily series under the given configuration.
pub fn compute(series: &DailySeries, config: &ScoringConfig) -> Result<ScoredSeries, ComputeError> {
    if series.is_empty() {
        return Err(ComputeError::NoData);
    }

    let ind = compute_indicators(series);

    let flags: Vec<SignalFlags> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let reading = BarReading {
                close: bar.close,
                ema9: ind.ema9[i],
                ema21: ind.ema21[i],
                sma50: ind.sma50[i],
                rsi: ind.rsi[i],
                stoch_k: ind.stoch_k[i],
                stoch_d: ind.stoch_d[i],
                vwap: ind.vwap[i],
                atr_percentile: ind.atr_percentile[i],
                vol_ratio: ind.vol_ratio[i],
            };
            SignalFlags::evaluate(&reading, &config.thresholds)
        })
        .collect();

    let scores: Vec<f64> = flags.iter().map(|f| config.weights.score(f)).collect();

    let percentiles = match config.rank_mode {
        RankMode::Global => percentile_rank(&scores),
        RankMode::Causal => causal_percentile_rank(&scores),
    };

    let rows: Vec<ScoredBar> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| ScoredBar {
            date: bar.date,
            close: bar.close,
            timing_score: scores[i],
            percentile: percentiles[i],
            signals: flags[i],
        })
        .collect();

    // Non-empty by the guard above.
    let last = rows.last().ok_or(ComputeError::NoData)?;
    let latest = LatestReading {
        date: last.date,
        timing_score: last.timing_score,
        percentile: last.percentile,
        signal: config.bands.classify(last.percentile),
    };

    Ok(ScoredSeries { rows, latest })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::DailyBar;
    use chrono::Days;

    /// Build a series of consecutive calendar days from (close, volume)
    /// pairs, with high/low bracketing the close by one point.
    fn series_from(bars: &[(f64, u64)]) -> DailySeries {
        let start: NaiveDate = "2024-01-02".parse().unwrap();
        let bars = bars
            .iter()
            .enumerate()
            .map(|(i, &(close, volume))| DailyBar {
                date: start + Days::new(i as u64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume,
            })
            .collect();
        DailySeries::new(bars).unwrap()
    }

    fn rising_series(n: usize) -> DailySeries {
        let bars: Vec<(f64, u64)> = (0..n).map(|i| (100.0 + i as f64, 1_000)).collect();
        series_from(&bars)
    }

    #[test]
    fn empty_series_is_the_only_error() {
        let series = DailySeries::new(Vec::new()).unwrap();
        let err = compute(&series, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ComputeError::NoData));
    }

    #[test]
    fn short_history_scores_without_error() {
        // Well under the 50-bar SMA lookback: no error, SMA stays NaN, the
        // trend signal stays inactive.
        let series = rising_series(10);
        let scored = compute(&series, &ScoringConfig::default()).unwrap();
        assert_eq!(scored.rows.len(), 10);
        for row in &scored.rows {
            assert!(!row.signals.ema);
        }
    }

    #[test]
    fn indicator_set_is_aligned() {
        let series = rising_series(60);
        let ind = compute_indicators(&series);
        assert_eq!(ind.ema9.len(), 60);
        assert_eq!(ind.sma50.len(), 60);
        assert_eq!(ind.stoch_d.len(), 60);
        assert_eq!(ind.atr_percentile.len(), 60);
        assert!(ind.sma50[48].is_nan());
        assert!(!ind.sma50[49].is_nan());
        assert!(ind.atr[12].is_nan());
        assert!(!ind.atr[13].is_nan());
    }

    #[test]
    fn rising_series_activates_trend_and_vwap() {
        // A monotonically rising close with constant volume: once the SMA50
        // warm-up completes, EMA9 > EMA21 > SMA50 (shorter lag sits higher
        // on a ramp) and the close is above the anchored VWAP.
        let series = rising_series(80);
        let scored = compute(&series, &ScoringConfig::default()).unwrap();
        for row in &scored.rows[50..] {
            assert!(row.signals.ema, "trend signal inactive at {}", row.date);
            assert!(row.signals.vwap);
            // The ramp saturates RSI at 100 and %K at its top: both
            // pullback-style signals stay off.
            assert!(!row.signals.rsi);
            assert!(!row.signals.stoch);
        }
    }

    #[test]
    fn constant_series_scores_zero() {
        // A flat market defines neither RSI nor the stochastic; the strict
        // comparisons on equal EMA/VWAP values are false. Every bar scores
        // exactly 0.
        let series = series_from(&vec![(100.0, 1_000); 60]);
        let scored = compute(&series, &ScoringConfig::default()).unwrap();
        for row in &scored.rows {
            assert_eq!(row.timing_score, 0.0);
        }
        // All scores tie, so every bar shares the same average-rank
        // percentile, just above 50.
        let p = scored.latest.percentile;
        assert!((p - 50.0).abs() < 1.0, "tied percentile near 50, got {p}");
        assert_eq!(scored.latest.signal, TradeSignal::Hold);
    }

    #[test]
    fn recompute_is_bit_identical() {
        let series = rising_series(120);
        let config = ScoringConfig::default();
        let a = compute(&series, &config).unwrap();
        let b = compute(&series, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn causal_rank_matches_global_on_last_bar() {
        // The last bar has no future to leak from, so both modes agree
        // there; earlier bars may differ.
        let bars: Vec<(f64, u64)> = (0..90)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.45).sin() * 10.0 + i as f64 * 0.1;
                let volume = 1_000 + (i % 7) * 300;
                (close, volume as u64)
            })
            .collect();
        let series = series_from(&bars);

        let mut config = ScoringConfig::default();
        config.rank_mode = RankMode::Global;
        let global = compute(&series, &config).unwrap();
        config.rank_mode = RankMode::Causal;
        let causal = compute(&series, &config).unwrap();

        assert_eq!(global.latest.percentile, causal.latest.percentile);
        assert_eq!(
            global.rows.last().unwrap().percentile,
            causal.rows.last().unwrap().percentile
        );
    }

    #[test]
    fn causal_rank_ignores_the_future() {
        // Drop a huge score at the end of the history: in causal mode the
        // earlier bars' percentiles must not move.
        let quiet: Vec<(f64, u64)> = (0..70).map(|_| (100.0, 1_000)).collect();
        let mut with_spike = quiet.clone();
        // A strong close burst with heavy volume lifts the final bars'
        // scores above the flat stretch.
        for (i, bar) in with_spike.iter_mut().enumerate().skip(60) {
            bar.0 = 100.0 + (i - 59) as f64 * 2.0;
            bar.1 = 5_000;
        }

        let mut config = ScoringConfig::default();
        config.rank_mode = RankMode::Causal;

        let base = compute(&series_from(&quiet), &config).unwrap();
        let spiked = compute(&series_from(&with_spike), &config).unwrap();
        for i in 0..55 {
            assert_eq!(
                base.rows[i].percentile, spiked.rows[i].percentile,
                "causal percentile moved at index {i}"
            );
        }
    }

    #[test]
    fn latest_reading_mirrors_last_row() {
        let series = rising_series(70);
        let scored = compute(&series, &ScoringConfig::default()).unwrap();
        let last = scored.rows.last().unwrap();
        assert_eq!(scored.latest.date, last.date);
        assert_eq!(scored.latest.timing_score, last.timing_score);
        assert_eq!(scored.latest.percentile, last.percentile);
    }

    #[test]
    fn rows_serialise_keyed_by_date() {
        let series = rising_series(5);
        let scored = compute(&series, &ScoringConfig::default()).unwrap();
        let json = serde_json::to_value(&scored.rows[0]).unwrap();
        assert_eq!(json["date"], "2024-01-02");
        assert!(json["timing_score"].is_number());
        assert!(json["signals"]["ema"].is_boolean());
    }
}
