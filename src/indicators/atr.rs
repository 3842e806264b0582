// =============================================================================
// Average True Range (ATR) — rolling-mean variant
// =============================================================================
//
// ATR measures volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H_0 - L_0                          (no previous close yet)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the trailing arithmetic mean of TR over `period` bars. Unlike
// Wilder's recursive smoothing, a bar leaves the average completely once it
// falls out of the window.
// =============================================================================

use crate::stats::{percentile_rank, rolling_mean};

/// True range per bar, aligned with the input. The first bar contributes
/// only its own high-low range.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let hl = highs[i] - lows[i];
        if i == 0 {
            out.push(hl);
            continue;
        }
        let prev_close = closes[i - 1];
        let hc = (highs[i] - prev_close).abs();
        let lc = (lows[i] - prev_close).abs();
        out.push(hl.max(hc).max(lc));
    }
    out
}

/// Compute the ATR series over `period` bars, aligned with the input.
/// Positions before index `period - 1` are NaN.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(&true_range(highs, lows, closes), period)
}

/// Replace each ATR value with its percentile rank (0–100) within the whole
/// series.
///
/// This is a global, not rolling, statistic: early bars are ranked against
/// volatility they have not "seen" yet. That look-ahead is intentional for
/// historical display — the rank answers "how does this bar's volatility sit
/// within the year" — but the result must not be read as a live as-of-today
/// value.
pub fn atr_percentile(atr: &[f64]) -> Vec<f64> {
    percentile_rank(atr)
}
