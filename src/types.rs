// =============================================================================
// Shared types used across the Vantage timing service
// =============================================================================

use serde::{Deserialize, Serialize};

/// Three-way trade classification of the most recent bar, derived from the
/// timing-score percentile. Boundaries are inclusive: exactly 80 is a
/// `BuyCall`, exactly 50 is a `Hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    #[serde(rename = "Buy Call")]
    BuyCall,
    Hold,
    Avoid,
}

impl std::fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuyCall => write!(f, "Buy Call"),
            Self::Hold => write!(f, "Hold"),
            Self::Avoid => write!(f, "Avoid"),
        }
    }
}

/// How the score percentile is ranked.
///
/// `Global` ranks every bar against the entire history, including bars that
/// occur later in time. This matches the reference dashboard and is fine for
/// historical display, but it looks ahead: a bar's percentile can change when
/// future bars arrive. `Causal` ranks each bar only against itself and
/// earlier bars and is safe to read as a live, as-of-today value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMode {
    Global,
    Causal,
}

impl Default for RankMode {
    fn default() -> Self {
        Self::Global
    }
}

impl std::fmt::Display for RankMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "Global"),
            Self::Causal => write!(f, "Causal"),
        }
    }
}
