// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// %K locates the close within the recent high-low range:
//
//   %K = 100 * (close - min(low, k_window)) / (max(high, k_window) - min(low, k_window))
//
// %D is the trailing mean of %K over `d_window` bars.
//
// When the window's range is zero (a completely flat stretch), the division
// is 0/0 and %K is NaN; the NaN then rides through %D's rolling mean. That
// is the pinned undefined-value policy — no clamping.
// =============================================================================

use crate::stats::{rolling_max, rolling_mean, rolling_min};

/// The paired %K/%D series, each aligned with the input bars.
#[derive(Debug, Clone)]
pub struct Stochastic {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Compute the stochastic oscillator over `k_window` bars with a `d_window`
/// smoothing. %K is NaN before index `k_window - 1`; %D needs a further
/// `d_window - 1` defined %K values.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_window: usize,
    d_window: usize,
) -> Stochastic {
    let lowest = rolling_min(lows, k_window);
    let highest = rolling_max(highs, k_window);

    let k: Vec<f64> = closes
        .iter()
        .zip(lowest.iter().zip(highest.iter()))
        .map(|(&close, (&ll, &hh))| 100.0 * (close - ll) / (hh - ll))
        .collect();

    let d = rolling_mean(&k, d_window);

    Stochastic { k, d }
}
