use super::{Period, Ticker};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Closing prices keyed by trading date, as returned by a market-data source
pub type ClosingSeries = BTreeMap<NaiveDate, f64>;

/// One ticker's values aligned to the table's date index
#[derive(Debug, Clone, PartialEq)]
pub struct PriceColumn {
    pub ticker: Ticker,
    pub values: Vec<Option<f64>>,
}

impl PriceColumn {
    pub fn has_values(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    pub fn first_value(&self) -> Option<f64> {
        self.values.iter().flatten().next().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().flatten().next().copied()
    }
}

/// Date-indexed table with one closing-price column per fetched ticker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

impl PriceTable {
    /// Empty table indexed by every calendar day of the period
    pub fn for_period(period: &Period) -> Self {
        Self {
            dates: period.calendar_days(),
            columns: Vec::new(),
        }
    }

    pub fn from_parts(dates: Vec<NaiveDate>, columns: Vec<PriceColumn>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == dates.len()));
        Self { dates, columns }
    }

    /// Align a series on the date index. Dates outside the index are ignored,
    /// index dates without a trade (or with a non-finite price) stay empty.
    pub fn insert_series(&mut self, ticker: Ticker, series: &ClosingSeries) {
        let values = self
            .dates
            .iter()
            .map(|date| series.get(date).copied().filter(|price| price.is_finite()))
            .collect();

        match self.columns.iter_mut().find(|c| c.ticker == ticker) {
            Some(existing) => existing.values = values,
            None => self.columns.push(PriceColumn { ticker, values }),
        }
    }

    /// Remove rows without any value, then columns without any value.
    ///
    /// Rows are only dropped when every column is empty there, so no column
    /// loses its last value in the first pass and a single pass of each
    /// filter leaves no empty row or column behind.
    pub fn drop_empty(&mut self) {
        let keep_rows: Vec<bool> = (0..self.dates.len())
            .map(|row| self.columns.iter().any(|c| c.values[row].is_some()))
            .collect();

        let mut row = 0;
        self.dates.retain(|_| {
            let keep = keep_rows[row];
            row += 1;
            keep
        });
        for column in &mut self.columns {
            let mut row = 0;
            column.values.retain(|_| {
                let keep = keep_rows[row];
                row += 1;
                keep
            });
        }

        self.columns.retain(PriceColumn::has_values);
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    pub fn column(&self, ticker: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.ticker.as_str() == ticker)
    }

    pub fn tickers(&self) -> Vec<&Ticker> {
        self.columns.iter().map(|c| &c.ticker).collect()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }
}
