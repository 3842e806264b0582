// =============================================================================
// Daily Bar Series — typed OHLCV history for one symbol
// =============================================================================
//
// The whole pipeline operates on a `DailySeries`: an ordered run of daily
// bars, one per trading date. Construction validates the ordering invariant
// (dates strictly increasing, no duplicates) so every downstream consumer can
// index bars and derived series positionally without re-checking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Errors raised when constructing a [`DailySeries`] from raw bars.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("bar dates out of order: {prev} followed by {next}")]
    OutOfOrder { prev: NaiveDate, next: NaiveDate },

    #[error("duplicate bar date: {date}")]
    DuplicateDate { date: NaiveDate },
}

/// An ordered daily bar history (oldest first, strictly increasing dates).
/// Only constructible through [`DailySeries::new`], which enforces the
/// ordering invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    bars: Vec<DailyBar>,
}

impl DailySeries {
    /// Build a series from raw bars, enforcing the date ordering invariant.
    pub fn new(bars: Vec<DailyBar>) -> Result<Self, SeriesError> {
        for pair in bars.windows(2) {
            let (prev, next) = (pair[0].date, pair[1].date);
            if next == prev {
                return Err(SeriesError::DuplicateDate { date: next });
            }
            if next < prev {
                return Err(SeriesError::OutOfOrder { prev, next });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    // ── Column accessors ────────────────────────────────────────────────
    // The indicator engine works on plain `&[f64]` slices; these build the
    // column views once per pipeline run.

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}
