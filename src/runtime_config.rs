// =============================================================================
// Runtime Configuration — dashboard settings with atomic save
// =============================================================================
//
// Central configuration hub for the Vantage timing service: watched symbols,
// fetch range, and every tunable of the scoring engine (weights, thresholds,
// classification bands, percentile rank mode).
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::signals::{ScoreWeights, SignalThresholds, TradeBands};
use crate::types::RankMode;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec!["SPY".to_string(), "QQQ".to_string()]
}

fn default_range() -> String {
    "1y".to_string()
}

// =============================================================================
// ScoringConfig
// =============================================================================

/// Every tunable of the scoring engine, grouped so the pipeline can take one
/// reference. The lookback windows are part of the score's definition and
/// are not configurable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Per-signal weights of the composite score (must sum to 1.0).
    #[serde(default)]
    pub weights: ScoreWeights,

    /// Thresholds of the six entry conditions.
    #[serde(default)]
    pub thresholds: SignalThresholds,

    /// Percentile bands for the Buy Call / Hold / Avoid classification.
    #[serde(default)]
    pub bands: TradeBands,

    /// Global (matches the reference dashboard, looks ahead) or causal
    /// (as-of-bar) score percentile ranking.
    #[serde(default)]
    pub rank_mode: RankMode,
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the Vantage timing service.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Symbols the dashboard scores (default: the two reference ETFs).
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Trailing history window requested from the provider (e.g. "1y").
    #[serde(default = "default_range")]
    pub range: String,

    /// Scoring engine tunables.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            range: default_range(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist or fails validation, returns an error so
    /// the caller can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config.validate()?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            range = %config.range,
            rank_mode = %config.scoring.rank_mode,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Check cross-field invariants the serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        self.scoring
            .weights
            .validate()
            .context("invalid scoring weights")?;
        if self.scoring.bands.hold_percentile > self.scoring.bands.buy_call_percentile {
            anyhow::bail!(
                "hold band ({}) above buy-call band ({})",
                self.scoring.bands.hold_percentile,
                self.scoring.bands.buy_call_percentile
            );
        }
        Ok(())
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbols, vec!["SPY", "QQQ"]);
        assert_eq!(cfg.range, "1y");
        assert_eq!(cfg.scoring.rank_mode, RankMode::Global);
        assert!((cfg.scoring.weights.ema - 0.3).abs() < f64::EPSILON);
        assert!((cfg.scoring.thresholds.vol_ratio_min - 1.2).abs() < f64::EPSILON);
        assert!((cfg.scoring.bands.buy_call_percentile - 80.0).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbols": ["IWM"], "scoring": { "rank_mode": "Causal" } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["IWM"]);
        assert_eq!(cfg.scoring.rank_mode, RankMode::Causal);
        assert_eq!(cfg.range, "1y");
        assert_eq!(cfg.scoring.weights, ScoreWeights::default());
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = RuntimeConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn validate_rejects_bad_weights() {
        let json = r#"{ "scoring": { "weights": { "ema": 0.9 } } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_bands() {
        let json = r#"{ "scoring": { "bands": { "hold_percentile": 90.0 } } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.validate().is_err());
    }
}
