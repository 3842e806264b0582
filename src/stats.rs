// =============================================================================
// Rolling-Window & Ranking Primitives
// =============================================================================
//
// Every derived series in the pipeline is built from the helpers in this
// module, and the undefined-value policy is pinned here once:
//
//   - Output series are always aligned 1:1 with their input. Positions with
//     insufficient history hold `f64::NAN` rather than being truncated.
//   - A rolling window containing a NaN yields NaN.
//   - Division follows IEEE-754: x/0 with x > 0 is +inf, 0/0 is NaN. The
//     indicator formulas rely on this (e.g. an all-gain RSI window saturates
//     to 100 through RS = +inf with no special-casing).
//   - NaN never participates in a rank; it ranks as NaN.
//
// Downstream comparisons against NaN are false, so a warm-up value can never
// activate a signal.

/// First difference, aligned with the input. `out[0]` is NaN.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] - values[i - 1];
    }
    out
}

/// Trailing arithmetic mean over `window` values, aligned with the input.
/// Positions before index `window - 1` are NaN; a `window` of zero yields an
/// all-NaN series.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Trailing minimum over `window` values, aligned with the input.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Trailing maximum over `window` values, aligned with the input.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

fn rolling(values: &[f64], window: usize, agg: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = agg(slice);
    }
    out
}

/// Percentile rank of each value within the whole series, scaled to 0–100.
///
/// Ties share their average rank and NaN inputs rank as NaN, so a series with
/// leading warm-up NaNs is ranked only over its defined tail. Note the
/// look-ahead: a bar is ranked against every bar in the series, including
/// later ones. Use [`causal_percentile_rank`] when that matters.
pub fn percentile_rank(values: &[f64]) -> Vec<f64> {
    let valid = values.iter().filter(|v| !v.is_nan()).count();
    let mut out = vec![f64::NAN; values.len()];
    if valid == 0 {
        return out;
    }
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        out[i] = average_rank_pct(v, values.iter().copied(), valid);
    }
    out
}

/// Percentile rank of each value among itself and all *earlier* values,
/// scaled to 0–100. No look-ahead: `out[t]` depends only on `values[..=t]`.
/// The first defined value always ranks 100.
pub fn causal_percentile_rank(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        let seen = &values[..=i];
        let valid = seen.iter().filter(|v| !v.is_nan()).count();
        out[i] = average_rank_pct(v, seen.iter().copied(), valid);
    }
    out
}

/// Average rank of `v` among the non-NaN values of `population`, as a
/// percentage of `valid` (the non-NaN count). Tied values occupy consecutive
/// ranks and share their mean.
fn average_rank_pct(v: f64, population: impl Iterator<Item = f64>, valid: usize) -> f64 {
    let mut less = 0usize;
    let mut equal = 0usize;
    for other in population {
        if other.is_nan() {
            continue;
        }
        if other < v {
            less += 1;
        } else if other == v {
            equal += 1;
        }
    }
    let avg_rank = less as f64 + (equal as f64 + 1.0) / 2.0;
    avg_rank / valid as f64 * 100.0
}
