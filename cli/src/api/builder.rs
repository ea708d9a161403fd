//! Builder pattern for configuring a performance run

use crate::{
    api::{analyzer::PerformanceAnalyzer, runner::PerformanceRunner},
    models::AnswerSets,
    services::{DataFetcher, MarketDataSource, PeriodSelector, Prompter, TickerSource},
    report::ChartSink,
    utils::{BusinessCalendar, Logger},
};
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_TICKER_FILE: &str = "etfs.txt";

/// Builder for a [`PerformanceRunner`]
///
/// Collects the settings first; the console, data source, calendar and chart
/// destination are handed over in [`RunnerBuilder::build`].
///
/// # Example
/// ```rust
/// use etfperf::api::RunnerBuilder;
/// use etfperf::report::NoChart;
/// use etfperf::services::{ConsolePrompter, InMemoryMarketData};
/// use etfperf::utils::WeekendCalendar;
///
/// let runner = RunnerBuilder::new()
///     .with_ticker_file("my_etfs.txt")
///     .report_not_found(true)
///     .build(ConsolePrompter::stdio(), InMemoryMarketData::new(), WeekendCalendar, NoChart);
/// ```
pub struct RunnerBuilder {
    answers: AnswerSets,
    ticker_file: PathBuf,
    today: Option<NaiveDate>,
    report_not_found: bool,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            answers: AnswerSets::default(),
            ticker_file: PathBuf::from(DEFAULT_TICKER_FILE),
            today: None,
            report_not_found: false,
        }
    }

    /// Set the accepted answers for the mode and YTD questions
    pub fn with_answers(mut self, answers: AnswerSets) -> Self {
        self.answers = answers;
        self
    }

    /// Set the file read in open-file mode
    pub fn with_ticker_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ticker_file = path.into();
        self
    }

    /// Pin the date used for year-to-date periods (for reproducible runs)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Print the tickers that could not be retrieved after the ranking
    pub fn report_not_found(mut self, enabled: bool) -> Self {
        self.report_not_found = enabled;
        self
    }

    pub fn build<P, S, C, K>(
        self,
        prompter: P,
        source: S,
        calendar: C,
        chart: K,
    ) -> PerformanceRunner<P, S, C, K>
    where
        P: Prompter,
        S: MarketDataSource,
        C: BusinessCalendar,
        K: ChartSink,
    {
        let mut period_selector = PeriodSelector::new(self.answers.clone());
        if let Some(today) = self.today {
            period_selector = period_selector.with_today(today);
        }

        PerformanceRunner {
            prompter,
            ticker_source: TickerSource::new(self.answers, self.ticker_file),
            period_selector,
            fetcher: DataFetcher::new(source),
            analyzer: PerformanceAnalyzer::new(),
            calendar,
            chart,
            report_not_found: self.report_not_found,
            logger: Logger::new("RUNNER"),
        }
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
