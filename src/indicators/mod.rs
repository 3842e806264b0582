// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators behind
// the timing score. Every function returns a series aligned 1:1 with its
// input; positions with insufficient history hold NaN rather than being
// truncated, so indicator outputs can be zipped together positionally and
// joined back to bar dates without bookkeeping.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod stochastic;
pub mod volume;
pub mod vwap;
