// =============================================================================
// Volume Ratio — participation versus recent average
// =============================================================================
//
// Vol_Ratio_t = volume_t / mean(volume, window)
//
// A ratio above 1 means today traded heavier than its trailing average; the
// scoring engine reads a ratio above its threshold as a participation
// confirmation. Warm-up positions are NaN; a zero average volume resolves
// through IEEE division (+inf for a positive numerator, NaN for 0/0).
// =============================================================================

use crate::stats::rolling_mean;

/// Compute the volume ratio series over `window` bars, aligned with the
/// input.
pub fn volume_ratio(volumes: &[f64], window: usize) -> Vec<f64> {
    let avg = rolling_mean(volumes, window);
    volumes
        .iter()
        .zip(avg.iter())
        .map(|(&vol, &mean)| vol / mean)
        .collect()
}
