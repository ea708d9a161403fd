use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;
use etfperf::{
    error::MarketDataError,
    models::{ClosingSeries, Period, Ticker},
    services::MarketDataSource,
    utils::Logger,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

use crate::config::DataSourceConfig;

const MAX_RETRIES: u32 = 5;
const DEFAULT_EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

#[derive(Debug, Error)]
pub enum YahooError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reported by the chart API itself, e.g. an unknown symbol
    #[error("{0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Daily closing prices from the Yahoo Finance chart API
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: Vec<Instant>,
    user_agents: Vec<String>,
    random_agent: bool,
    logger: Logger,
}

impl YahooClient {
    pub fn new(config: &DataSourceConfig) -> Result<Self, YahooError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15".to_string(),
        ];

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(YahooClient {
            client,
            base_url,
            rate_limit_per_minute: config.rate_limit_per_minute.max(1),
            request_timestamps: Vec::new(),
            user_agents,
            random_agent: config.random_agent,
            logger: Logger::new("YAHOO"),
        })
    }

    fn get_user_agent(&self) -> &str {
        if self.random_agent {
            use rand::seq::IndexedRandom;
            if let Some(agent) = self.user_agents.choose(&mut rand::rng()) {
                return agent;
            }
        }
        &self.user_agents[0]
    }

    async fn enforce_rate_limit(&mut self) {
        let window = Duration::from_secs(60);
        let now = Instant::now();

        // Forget requests older than the window
        self.request_timestamps.retain(|&at| now.duration_since(at) < window);

        if self.request_timestamps.len() >= self.rate_limit_per_minute as usize {
            if let Some(&oldest) = self.request_timestamps.first() {
                let wait = window.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    self.logger.debug(&format!("Rate limit reached, waiting {:?}", wait));
                    sleep(wait + Duration::from_millis(100)).await;
                }
            }
        }

        self.request_timestamps.push(Instant::now());
    }

    async fn make_request(&mut self, url: &str, query: &[(&str, String)]) -> Result<String, YahooError> {
        for attempt in 0..MAX_RETRIES {
            self.enforce_rate_limit().await;

            if attempt > 0 {
                let delay = Duration::from_secs_f64(2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>());
                sleep(delay.min(Duration::from_secs(60))).await;
            }

            let user_agent = self.get_user_agent().to_string();
            let response = self
                .client
                .get(url)
                .query(query)
                .header("Accept", "application/json, text/plain, */*")
                .header("Accept-Language", "en-US,en;q=0.9")
                .header("User-Agent", user_agent)
                .send()
                .await;

            let resp = match response {
                Ok(resp) => resp,
                Err(err) => {
                    self.logger.debug(&format!("Attempt {} failed: {}", attempt + 1, err));
                    continue;
                }
            };

            let status = resp.status();
            if status.is_success() {
                return Ok(resp.text().await?);
            }
            if should_retry(status) {
                self.logger.debug(&format!("Attempt {} got HTTP {}", attempt + 1, status));
                continue;
            }

            // Unknown symbols come back as a 4xx with a chart error body
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(&body).unwrap_or_else(|| YahooError::InvalidResponse(format!("HTTP {}", status))));
        }

        Err(YahooError::InvalidResponse("Max retries exceeded".to_string()))
    }

    pub async fn fetch_closing_prices(&mut self, symbol: &str, period: &Period) -> Result<ClosingSeries, YahooError> {
        let url = format!("{}{}", self.base_url, symbol);
        let body = self.make_request(&url, &chart_query(period)).await?;
        parse_chart(&body, period)
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn closing_prices(&mut self, ticker: &Ticker, period: &Period) -> Result<ClosingSeries, MarketDataError> {
        self.fetch_closing_prices(ticker.as_str(), period)
            .await
            .map_err(|err| MarketDataError::from_reason(ticker.as_str(), err.to_string()))
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn api_error(body: &str) -> Option<YahooError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).ok()?;
    envelope.chart.error.map(|err| YahooError::Api(err.description))
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or_default()
}

/// Query window for `period`; `period2` is exclusive upstream, so it points past the end date
fn chart_query(period: &Period) -> Vec<(&'static str, String)> {
    let after_end = period.end().checked_add_days(Days::new(1)).unwrap_or(period.end());
    vec![
        ("period1", midnight_utc(period.start()).to_string()),
        ("period2", midnight_utc(after_end).to_string()),
        ("interval", "1d".to_string()),
        ("events", "history".to_string()),
    ]
}

/// Extract closing prices keyed by exchange-local trading date.
///
/// Rows outside `period` and rows without a finite close are skipped.
fn parse_chart(body: &str, period: &Period) -> Result<ClosingSeries, YahooError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;
    if let Some(err) = envelope.chart.error {
        return Err(YahooError::Api(if err.description.is_empty() { err.code } else { err.description }));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| YahooError::InvalidResponse("empty chart result".to_string()))?;

    let tz: Tz = result
        .meta
        .exchange_timezone_name
        .as_deref()
        .and_then(|name| name.parse().ok())
        .unwrap_or(DEFAULT_EXCHANGE_TZ);

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut series = ClosingSeries::new();
    for (ts, close) in result.timestamp.iter().zip(closes) {
        let Some(close) = close.filter(|c| c.is_finite()) else {
            continue;
        };
        let Some(utc) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };
        let date = utc.with_timezone(&tz).date_naive();
        if date >= period.start() && date <= period.end() {
            series.insert(date, close);
        }
    }

    Ok(series)
}
