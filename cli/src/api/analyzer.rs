//! Normalization and ranking of a fetched price table

use crate::{
    models::{
        BestFundsView, NormalizedTable, PerformanceSeries, PriceColumn, PriceTable, Ranking,
        RankingEntry,
    },
    utils::Logger,
};

/// Ranking, chart view and the normalized table they were derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub normalized: NormalizedTable,
    pub ranking: Ranking,
    pub view: BestFundsView,
}

/// Turns a raw price table into a best-first ranking
pub struct PerformanceAnalyzer {
    logger: Logger,
}

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("ANALYZER"),
        }
    }

    /// Clean, normalize and rank `table`.
    ///
    /// Returns `None` when nothing is left after dropping empty rows and columns.
    pub fn analyze(&self, mut table: PriceTable) -> Option<Analysis> {
        table.drop_empty();
        if table.row_count() == 0 {
            self.logger.warn("No price rows left after dropping empty rows and columns");
            return None;
        }

        let normalized = self.normalize(&table)?;
        let ranking = rank(&normalized);
        let view = best_funds_view(&normalized, &ranking);

        self.logger.info_with_data(
            "Ranking computed",
            ranking
                .iter()
                .map(|e| format!("{}={:.1}", e.ticker, e.performance_pct))
                .collect::<Vec<_>>(),
        );

        Some(Analysis {
            normalized,
            ranking,
            view,
        })
    }

    /// Divide each column by its baseline, the first price in the window.
    ///
    /// A column whose first row is empty takes its first observed price as the
    /// baseline. Columns with a non-positive baseline cannot be normalized and
    /// are dropped.
    pub fn normalize(&self, table: &PriceTable) -> Option<NormalizedTable> {
        if table.is_empty() {
            return None;
        }

        let mut columns = Vec::with_capacity(table.columns().len());
        for column in table.columns() {
            let Some(baseline) = column.first_value().filter(|b| b.is_finite() && *b > 0.0) else {
                self.logger.warn(&format!("{} has no usable baseline price", column.ticker));
                continue;
            };
            columns.push(PriceColumn {
                ticker: column.ticker.clone(),
                values: column.values.iter().map(|v| v.map(|price| price / baseline)).collect(),
            });
        }

        if columns.is_empty() {
            return None;
        }

        Some(NormalizedTable {
            dates: table.dates().to_vec(),
            columns,
        })
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to one decimal place, half away from zero
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a normalized value into a percentage gain or loss
pub fn to_percentage(normalized: f64) -> f64 {
    (normalized - 1.0) * 100.0
}

/// Rank columns by their last normalized value, best first.
///
/// Sorting happens on the unrounded performance and is stable, so equal
/// values keep the table's column order.
pub fn rank(normalized: &NormalizedTable) -> Ranking {
    let mut scored: Vec<(&PriceColumn, f64)> = normalized
        .columns
        .iter()
        .filter_map(|column| column.last_value().map(|last| (column, to_percentage(last))))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ranking {
        entries: scored
            .into_iter()
            .map(|(column, performance)| RankingEntry {
                ticker: column.ticker.clone(),
                performance_pct: round_to_one_decimal(performance),
            })
            .collect(),
    }
}

/// Percentage series of the ranked tickers, in the table's column order
pub fn best_funds_view(normalized: &NormalizedTable, ranking: &Ranking) -> BestFundsView {
    let series = normalized
        .columns
        .iter()
        .filter(|column| ranking.contains(&column.ticker))
        .map(|column| PerformanceSeries {
            ticker: column.ticker.clone(),
            values: column.values.iter().map(|v| v.map(to_percentage)).collect(),
        })
        .collect();

    BestFundsView {
        dates: normalized.dates.clone(),
        series,
    }
}
