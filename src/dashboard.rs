// =============================================================================
// Dashboard Payloads — consumption contracts for the presentation layer
// =============================================================================
//
// The service does not render anything itself; it hands the frontend three
// artifacts per symbol and lets the charting library do the drawing:
//
//   - scalar metrics (timing score, percentile, trade classification)
//   - a gauge spec over [0, 100] with a threshold marker at the buy band
//   - a dual-axis line chart series (score on the left axis, percentile on
//     the right) over the full history
//
// Everything here is a thin, pure mapping from a `ScoredSeries`; it is kept
// separate from the pipeline so it can be tested and evolved independently.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::pipeline::ScoredSeries;
use crate::signals::TradeBands;
use crate::types::TradeSignal;

/// Scalar metrics for the metric tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub timing_score: f64,
    pub percentile: f64,
    pub signal: TradeSignal,
}

/// Gauge rendering spec: current percentile on a 0–100 dial with a threshold
/// marker at the buy band and the classification colour for the bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub value: f64,
    pub range: [f64; 2],
    pub threshold: f64,
    pub bar_color: &'static str,
}

/// Dual-axis line chart series over the full history. `timing_score` plots
/// on the primary axis and `percentile` on the secondary; all three columns
/// align positionally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub dates: Vec<NaiveDate>,
    pub timing_score: Vec<f64>,
    pub percentile: Vec<f64>,
}

/// The complete display payload for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolDashboard {
    pub symbol: String,
    pub metrics: Metrics,
    pub gauge: GaugeSpec,
    pub chart: ChartSeries,
}

/// Classification colour of the gauge bar.
fn bar_color(percentile: f64, bands: &TradeBands) -> &'static str {
    if percentile >= bands.buy_call_percentile {
        "green"
    } else if percentile >= bands.hold_percentile {
        "yellow"
    } else {
        "red"
    }
}

/// Map a scored series to its display payload.
pub fn build(symbol: &str, scored: &ScoredSeries, bands: &TradeBands) -> SymbolDashboard {
    let latest = &scored.latest;

    SymbolDashboard {
        symbol: symbol.to_string(),
        metrics: Metrics {
            timing_score: latest.timing_score,
            percentile: latest.percentile,
            signal: latest.signal,
        },
        gauge: GaugeSpec {
            value: latest.percentile,
            range: [0.0, 100.0],
            threshold: bands.buy_call_percentile,
            bar_color: bar_color(latest.percentile, bands),
        },
        chart: ChartSeries {
            dates: scored.rows.iter().map(|r| r.date).collect(),
            timing_score: scored.rows.iter().map(|r| r.timing_score).collect(),
            percentile: scored.rows.iter().map(|r| r.percentile).collect(),
        },
    }
}
