// =============================================================================
// Volume-Weighted Average Price (VWAP) — cumulative from series start
// =============================================================================
//
// VWAP_t = sum(close_i * volume_i, i <= t) / sum(volume_i, i <= t)
//
// This is the anchored form: both sums run from the first bar of the series,
// not over a rolling window, so the denominator grows monotonically over the
// whole history. A series that starts with zero-volume bars yields 0/0 = NaN
// until the first traded bar.
// =============================================================================

/// Compute the cumulative VWAP series, aligned with the input.
pub fn vwap(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;
    closes
        .iter()
        .zip(volumes.iter())
        .map(|(&close, &volume)| {
            cum_pv += close * volume;
            cum_vol += volume;
            cum_pv / cum_vol
        })
        .collect()
}
