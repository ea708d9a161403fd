use crate::{
    models::{Period, PriceTable, Ticker},
    services::MarketDataSource,
    utils::{log_fetch, Logger, Timer},
};

/// Result of a fetch pass: the assembled table plus the tickers that could not be retrieved
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub table: PriceTable,
    pub not_found: Vec<Ticker>,
}

/// Pulls one closing-price series per ticker and lays them out on a calendar-day index
pub struct DataFetcher<S> {
    source: S,
    logger: Logger,
}

impl<S: MarketDataSource> DataFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            logger: Logger::new("DATA_FETCHER"),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch every ticker one after the other.
    ///
    /// A failing ticker is logged, remembered in `not_found` and left out of
    /// the table; it never aborts the pass.
    pub async fn fetch(&mut self, tickers: &[Ticker], period: &Period) -> FetchReport {
        let timer = Timer::start("price fetch");
        let mut report = FetchReport {
            table: PriceTable::for_period(period),
            not_found: Vec::new(),
        };

        log_fetch(&format!(
            "Fetching {} tickers from {} for {}",
            tickers.len(),
            self.source.name(),
            period
        ));

        for ticker in tickers {
            match self.source.closing_prices(ticker, period).await {
                Ok(series) if series.is_empty() => {
                    self.logger.warn(&format!("{} returned no prices for {}", self.source.name(), ticker));
                    report.not_found.push(ticker.clone());
                }
                Ok(series) => {
                    self.logger.debug(&format!("{}: {} closing prices", ticker, series.len()));
                    report.table.insert_series(ticker.clone(), &series);
                }
                Err(err) => {
                    self.logger.error_with_error("Ticker dropped", &err);
                    report.not_found.push(ticker.clone());
                }
            }
        }

        log_fetch(&format!(
            "Fetched {}/{} tickers",
            tickers.len() - report.not_found.len(),
            tickers.len()
        ));
        timer.log_elapsed("DATA_FETCHER");

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClosingSeries;
    use crate::services::InMemoryMarketData;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn tickers(symbols: &[&str]) -> Vec<Ticker> {
        symbols.iter().filter_map(|s| Ticker::parse(s)).collect()
    }

    #[tokio::test]
    async fn test_fetch_absorbs_failures() {
        let source = InMemoryMarketData::new()
            .with_series("AAA", ClosingSeries::from([(date(4), 10.0), (date(5), 11.0)]))
            .with_failure("BBB", "connection refused")
            .with_series("DDD", ClosingSeries::new());
        let mut fetcher = DataFetcher::new(source);
        let period = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|start| Period::new(start, date(7)))
            .unwrap();

        let report = fetcher.fetch(&tickers(&["AAA", "BBB", "CCC", "DDD"]), &period).await;

        assert_eq!(report.table.dates().len(), 7);
        assert_eq!(report.table.tickers(), vec![&Ticker::parse("AAA").unwrap()]);
        assert_eq!(report.not_found, tickers(&["BBB", "CCC", "DDD"]));
        assert_eq!(fetcher.source().requests(), &["AAA", "BBB", "CCC", "DDD"]);
    }

    #[tokio::test]
    async fn test_fetch_with_no_tickers() {
        let mut fetcher = DataFetcher::new(InMemoryMarketData::new());
        let period = Period::new(date(1), date(3)).unwrap();
        let report = fetcher.fetch(&[], &period).await;
        assert!(report.table.is_empty());
        assert!(report.not_found.is_empty());
    }
}
