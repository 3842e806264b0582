// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Every timing endpoint fetches fresh
// history and recomputes the full pipeline on the spot — there is no cache
// and no background refresh, so a response always reflects the provider's
// current data.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::{AppState, ErrorRecord};
use crate::dashboard::{self, SymbolDashboard};
use crate::pipeline::ScoredBar;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/config/symbols", post(set_symbols))
        .route("/api/v1/dashboard", get(dashboard_all))
        .route("/api/v1/timing/:symbol", get(timing_for_symbol))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_s: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        uptime_s: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Config
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read().clone();
    Json(config)
}

#[derive(Deserialize)]
struct SymbolsUpdate {
    symbols: Vec<String>,
}

async fn set_symbols(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SymbolsUpdate>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let symbols: Vec<String> = update
        .symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "symbols list must not be empty" })),
        ));
    }

    let config_clone = {
        let mut config = state.runtime_config.write();
        config.symbols = symbols.clone();
        config.clone()
    };

    // Save to disk (best-effort).
    if let Err(e) = config_clone.save(crate::CONFIG_PATH) {
        warn!(error = %e, "failed to save symbols update to disk");
    }

    state.increment_version();
    info!(symbols = ?symbols, "watched symbols updated via API");

    Ok(Json(serde_json::json!({ "symbols": symbols })))
}

// =============================================================================
// Dashboard — all configured symbols
// =============================================================================

/// One symbol's failure within an otherwise successful dashboard response.
#[derive(Serialize)]
struct SymbolFailure {
    symbol: String,
    error: String,
}

#[derive(Serialize)]
struct DashboardResponse {
    generated_at: i64,
    rank_mode: String,
    symbols: Vec<SymbolDashboard>,
    failures: Vec<SymbolFailure>,
    recent_errors: Vec<ErrorRecord>,
}

async fn dashboard_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (symbols, bands, rank_mode) = {
        let config = state.runtime_config.read();
        (
            config.symbols.clone(),
            config.scoring.bands.clone(),
            config.scoring.rank_mode,
        )
    };

    let mut payloads = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    // One symbol failing must not take the others down: collect its error
    // and keep going.
    for symbol in &symbols {
        match state.score_symbol(symbol).await {
            Ok(scored) => payloads.push(dashboard::build(symbol, &scored, &bands)),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "symbol failed to score");
                state.push_error(symbol, e.to_string());
                failures.push(SymbolFailure {
                    symbol: symbol.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let resp = DashboardResponse {
        generated_at: chrono::Utc::now().timestamp_millis(),
        rank_mode: rank_mode.to_string(),
        symbols: payloads,
        failures,
        recent_errors: state.recent_errors.read().clone(),
    };
    Json(resp)
}

// =============================================================================
// Timing — one symbol with its full scored table
// =============================================================================

#[derive(Serialize)]
struct SymbolTimingResponse {
    #[serde(flatten)]
    dashboard: SymbolDashboard,
    rank_mode: String,
    rows: Vec<ScoredBar>,
}

async fn timing_for_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let symbol = symbol.trim().to_uppercase();

    let (bands, rank_mode) = {
        let config = state.runtime_config.read();
        (config.scoring.bands.clone(), config.scoring.rank_mode)
    };

    match state.score_symbol(&symbol).await {
        Ok(scored) => {
            let payload = SymbolTimingResponse {
                dashboard: dashboard::build(&symbol, &scored, &bands),
                rank_mode: rank_mode.to_string(),
                rows: scored.rows,
            };
            Ok(Json(payload))
        }
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "symbol failed to score");
            state.push_error(&symbol, e.to_string());

            let status = if e.is_no_data() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            Err((status, Json(serde_json::json!({ "error": e.to_string() }))))
        }
    }
}
