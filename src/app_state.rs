// =============================================================================
// Central Application State — Vantage Timing Service
// =============================================================================
//
// The single source of truth for the service. The dashboard recomputes every
// series from scratch on each request, so the state is deliberately small:
// the runtime configuration, the provider client, a version counter, and a
// capped ring of recent per-symbol errors for the dashboard's error panel.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the mutable configuration and error ring.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::{self, ComputeError, ScoredSeries};
use crate::provider::{MarketDataClient, ProviderError};
use crate::runtime_config::RuntimeConfig;

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Symbol whose fetch or scoring failed.
    pub symbol: String,
    /// Human-readable error message.
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Failure of one symbol's fetch-and-score pass. Scoped to that symbol; the
/// caller keeps going with the others.
#[derive(Debug, Error)]
pub enum SymbolScoreError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Compute(#[from] ComputeError),
}

impl SymbolScoreError {
    /// True when the failure means "this symbol has no usable history"
    /// (unknown symbol, empty history) rather than a transport or payload
    /// problem.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::Provider(ProviderError::NoData { .. } | ProviderError::Api { .. })
                | Self::Compute(ComputeError::NoData)
        )
    }
}

/// Central application state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// configuration change or recorded error.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    pub provider: MarketDataClient,

    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            provider: MarketDataClient::new(),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Error Logging ───────────────────────────────────────────────────

    /// Record a per-symbol error. The ring is capped at
    /// [`MAX_RECENT_ERRORS`]; oldest entries are evicted first.
    pub fn push_error(&self, symbol: &str, message: String) {
        let record = ErrorRecord {
            symbol: symbol.to_string(),
            message,
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }

        self.increment_version();
    }

    // ── Fetch & Score ───────────────────────────────────────────────────

    /// Fetch one symbol's trailing history and run the scoring pipeline
    /// over it. Stateless: nothing is cached between calls.
    pub async fn score_symbol(&self, symbol: &str) -> Result<ScoredSeries, SymbolScoreError> {
        let (range, scoring) = {
            let config = self.runtime_config.read();
            (config.range.clone(), config.scoring.clone())
        };

        let series = self.provider.fetch_daily_history(symbol, &range).await?;
        let scored = pipeline::compute(&series, &scoring)?;
        Ok(scored)
    }
}
