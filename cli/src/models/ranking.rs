use super::{PriceColumn, Ticker};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price table rescaled so every series starts at 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<PriceColumn>,
}

/// A ticker's cumulative performance over the window, in percent (one decimal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub ticker: Ticker,
    pub performance_pct: f64,
}

/// Ranking entries ordered best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.entries.iter().any(|entry| &entry.ticker == ticker)
    }

    pub fn best(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingEntry> {
        self.entries.iter()
    }
}

/// Percentage performance series handed to the chart
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSeries {
    pub ticker: Ticker,
    pub values: Vec<Option<f64>>,
}

impl PerformanceSeries {
    /// Last plotted point as (row index, value)
    pub fn final_point(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .rev()
            .find_map(|(idx, value)| value.map(|v| (idx, v)))
    }
}

/// Normalized series of the ranked funds, expressed as (value - 1) * 100
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestFundsView {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<PerformanceSeries>,
}

impl BestFundsView {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.series.is_empty()
    }

    pub fn series_for(&self, ticker: &str) -> Option<&PerformanceSeries> {
        self.series.iter().find(|s| s.ticker.as_str() == ticker)
    }
}
