use crate::{
    error::MarketDataError,
    models::{ClosingSeries, Period, Ticker},
};
use std::collections::HashMap;

/// External provider of daily closing prices
#[async_trait::async_trait]
pub trait MarketDataSource: Send {
    fn name(&self) -> &str;

    /// Closing prices of `ticker` for the trading days inside `period`, end date included
    async fn closing_prices(
        &mut self,
        ticker: &Ticker,
        period: &Period,
    ) -> Result<ClosingSeries, MarketDataError>;
}

/// Fixed in-memory price source, keyed by ticker symbol.
///
/// Unknown symbols fail with the delisted reason, like the live provider does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    series: HashMap<String, Result<ClosingSeries, String>>,
    requests: Vec<String>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, series: ClosingSeries) -> Self {
        self.series.insert(ticker.to_string(), Ok(series));
        self
    }

    pub fn with_failure(mut self, ticker: &str, reason: &str) -> Self {
        self.series.insert(ticker.to_string(), Err(reason.to_string()));
        self
    }

    /// Symbols requested so far, in call order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

#[async_trait::async_trait]
impl MarketDataSource for InMemoryMarketData {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn closing_prices(
        &mut self,
        ticker: &Ticker,
        period: &Period,
    ) -> Result<ClosingSeries, MarketDataError> {
        self.requests.push(ticker.to_string());

        match self.series.get(ticker.as_str()) {
            Some(Ok(series)) => Ok(series
                .range(period.start()..=period.end())
                .map(|(date, price)| (*date, *price))
                .collect()),
            Some(Err(reason)) => Err(MarketDataError::from_reason(ticker.as_str(), reason.clone())),
            None => Err(MarketDataError::from_reason(
                ticker.as_str(),
                "No data found, symbol may be delisted",
            )),
        }
    }
}
