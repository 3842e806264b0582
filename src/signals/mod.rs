// =============================================================================
// Signals Module
// =============================================================================
//
// Scoring pipeline for the timing dashboard:
// - Binary entry conditions thresholded from the indicator set
// - Weighted composite timing score on a 0–100 scale
// - Percentile ranking and the three-way trade classification

pub mod conditions;
pub mod score;

pub use conditions::{SignalFlags, SignalThresholds};
pub use score::{ScoreWeights, TradeBands, WeightError};
