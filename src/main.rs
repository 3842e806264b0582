// =============================================================================
// Vantage Timing — Main Entry Point
// =============================================================================
//
// Serves the ETF options timing dashboard API. There are no background
// loops: every request fetches fresh daily history and recomputes the
// scoring pipeline from scratch, so the process holds nothing but its
// configuration between requests.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod dashboard;
mod indicators;
mod pipeline;
mod provider;
mod runtime_config;
mod series;
mod signals;
mod stats;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

/// On-disk location of the runtime configuration.
pub const CONFIG_PATH: &str = "vantage_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Vantage Timing — Starting Up                     ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override symbols from env if available.
    if let Ok(syms) = std::env::var("VANTAGE_SYMBOLS") {
        config.symbols = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if config.symbols.is_empty() {
        config.symbols = RuntimeConfig::default().symbols;
    }

    info!(
        symbols = ?config.symbols,
        range = %config.range,
        rank_mode = %config.scoring.rank_mode,
        "Configured watch list"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Start the API server ──────────────────────────────────────────
    let api_state = state.clone();
    let bind_addr =
        std::env::var("VANTAGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let bind_addr_clone = bind_addr.clone();

    tokio::spawn(async move {
        let app = api::rest::router(api_state);
        let listener = tokio::net::TcpListener::bind(&bind_addr_clone)
            .await
            .expect("Failed to bind API server");
        info!(addr = %bind_addr_clone, "API server listening");
        axum::serve(listener, app)
            .await
            .expect("API server failed");
    });

    // ── 4. Startup snapshot ──────────────────────────────────────────────
    // Score each watched symbol once so the log shows a reading right away.
    // A symbol that fails is reported and skipped; the others still score.
    let symbols = state.runtime_config.read().symbols.clone();
    for symbol in &symbols {
        match state.score_symbol(symbol).await {
            Ok(scored) => {
                info!(
                    symbol = %symbol,
                    date = %scored.latest.date,
                    score = scored.latest.timing_score,
                    percentile = scored.latest.percentile,
                    signal = %scored.latest.signal,
                    "startup reading"
                );
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "startup reading failed");
                state.push_error(symbol, e.to_string());
            }
        }
    }

    info!("Dashboard API running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("Vantage Timing shut down complete.");
    Ok(())
}
