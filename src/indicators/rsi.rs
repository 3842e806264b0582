// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// This is the plain rolling-mean formulation, not Wilder's recursive
// smoothing:
//
//   gain_t = max(delta_t, 0)        loss_t = max(-delta_t, 0)
//   RS     = mean(gain, period) / mean(loss, period)
//   RSI    = 100 - 100 / (1 + RS)
//
// The first bar has no previous close; its delta counts as zero gain and
// zero loss, so the first defined RSI lands at index `period - 1`.
//
// Division edge cases resolve through IEEE-754 arithmetic (see `stats`):
// a window of pure gains gives RS = +inf and RSI = 100; a window with no
// movement at all gives 0/0 = NaN, which reads as "no signal" downstream.
// =============================================================================

use crate::stats::{diff, rolling_mean};

/// Compute the RSI series for the given `closes` and `period`, aligned with
/// the input. Positions before index `period - 1` are NaN.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let deltas = diff(closes);

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for (i, &d) in deltas.iter().enumerate() {
        // The undefined first delta (and any NaN delta) contributes zero to
        // both sides, like the reference.
        if d > 0.0 {
            gains[i] = d;
        } else if d < 0.0 {
            losses[i] = -d;
        }
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| {
            let rs = g / l;
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}
