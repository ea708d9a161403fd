//! One interactive run: tickers, period, fetch, ranking, chart

use crate::{
    api::analyzer::PerformanceAnalyzer,
    error::{InputError, Result},
    models::{BestFundsView, Period, Ranking, Ticker},
    report::{format_not_found, format_ranking, ChartSink},
    services::{DataFetcher, MarketDataSource, PeriodSelector, Prompter, TickerSource},
    utils::{BusinessCalendar, BusinessDay, Logger},
};
use std::path::PathBuf;

pub const NO_DATA_MESSAGE: &str = "No valid ETF data found. Exiting.";

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub period: Period,
    pub ranking: Ranking,
    pub view: BestFundsView,
    pub not_found: Vec<Ticker>,
    pub chart: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Ticker intake was rejected; the diagnostic is already on the console
    NoTickers,
    /// Nothing usable came back from the data source
    NoData { not_found: Vec<Ticker> },
    Completed(RunSummary),
}

pub struct PerformanceRunner<P, S, C, K> {
    pub(crate) prompter: P,
    pub(crate) ticker_source: TickerSource,
    pub(crate) period_selector: PeriodSelector,
    pub(crate) fetcher: DataFetcher<S>,
    pub(crate) analyzer: PerformanceAnalyzer,
    pub(crate) calendar: C,
    pub(crate) chart: K,
    pub(crate) report_not_found: bool,
    pub(crate) logger: Logger,
}

impl<P, S, C, K> PerformanceRunner<P, S, C, K>
where
    P: Prompter,
    S: MarketDataSource,
    C: BusinessCalendar,
    K: ChartSink,
{
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let tickers = match self.ticker_source.obtain_tickers(&mut self.prompter) {
            Ok(tickers) => tickers,
            Err(InputError::FileNotFound { .. } | InputError::InvalidSelection { .. }) => {
                return Ok(RunOutcome::NoTickers);
            }
            Err(err) => return Err(err.into()),
        };

        let period = self.period_selector.obtain_period(&mut self.prompter)?;
        self.log_trading_window(&period);

        let report = self.fetcher.fetch(&tickers, &period).await;
        let not_found = report.not_found;

        let Some(analysis) = self.analyzer.analyze(report.table) else {
            self.prompter.say(NO_DATA_MESSAGE)?;
            self.print_not_found(&not_found)?;
            return Ok(RunOutcome::NoData { not_found });
        };

        self.prompter.say(&format_ranking(&analysis.ranking))?;
        self.print_not_found(&not_found)?;

        let chart = self.chart.render(&analysis.view)?;
        if let Some(path) = &chart {
            self.prompter.say(&format!("Chart saved to {}", path.display()))?;
        }

        Ok(RunOutcome::Completed(RunSummary {
            period,
            ranking: analysis.ranking,
            view: analysis.view,
            not_found,
            chart,
        }))
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    fn print_not_found(&mut self, not_found: &[Ticker]) -> Result<()> {
        if !self.report_not_found {
            return Ok(());
        }
        if let Some(line) = format_not_found(not_found) {
            self.prompter.say(&line)?;
        }
        Ok(())
    }

    fn log_trading_window(&self, period: &Period) {
        let first = BusinessDay::next(&self.calendar, period.start());
        let last = BusinessDay::previous(&self.calendar, period.end());
        if first > last {
            self.logger.warn(&format!("No business day between {}", period));
        } else {
            self.logger.info(&format!(
                "Trading window {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::RunnerBuilder;
    use super::*;
    use crate::error::ReportError;
    use crate::models::ClosingSeries;
    use crate::services::{ConsolePrompter, InMemoryMarketData};
    use crate::utils::WeekendCalendar;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingChart {
        views: Vec<BestFundsView>,
    }

    impl ChartSink for RecordingChart {
        fn render(&mut self, view: &BestFundsView) -> std::result::Result<Option<PathBuf>, ReportError> {
            self.views.push(view.clone());
            Ok(None)
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn five_day_source() -> InMemoryMarketData {
        let aaa = [100.0, 102.0, 105.0, 108.0, 110.0];
        let bbb = [100.0, 99.0, 97.0, 96.0, 95.0];
        InMemoryMarketData::new()
            .with_series("AAA", (4..=8).map(date).zip(aaa).collect::<ClosingSeries>())
            .with_series("BBB", (4..=8).map(date).zip(bbb).collect::<ClosingSeries>())
    }

    fn runner(
        input: &str,
        source: InMemoryMarketData,
        report_not_found: bool,
    ) -> PerformanceRunner<ConsolePrompter<Cursor<String>, Vec<u8>>, InMemoryMarketData, WeekendCalendar, RecordingChart>
    {
        RunnerBuilder::new()
            .with_today(date(20))
            .report_not_found(report_not_found)
            .build(
                ConsolePrompter::new(Cursor::new(input.to_string()), Vec::new()),
                source,
                WeekendCalendar,
                RecordingChart::default(),
            )
    }

    #[tokio::test]
    async fn test_end_to_end_ranking() {
        let mut runner = runner("W\nbbb, aaa\nN\n04/03/2024\n08/03/2024\n", five_day_source(), false);

        let outcome = runner.run().await.unwrap();
        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run, got {:?}", outcome);
        };

        let ranking: Vec<(&str, f64)> = summary
            .ranking
            .iter()
            .map(|e| (e.ticker.as_str(), e.performance_pct))
            .collect();
        assert_eq!(ranking, vec![("AAA", 10.0), ("BBB", -5.0)]);

        let (_, aaa_last) = summary.view.series_for("AAA").unwrap().final_point().unwrap();
        let (_, bbb_last) = summary.view.series_for("BBB").unwrap().final_point().unwrap();
        assert!((aaa_last - 10.0).abs() < 1e-9);
        assert!((bbb_last + 5.0).abs() < 1e-9);

        assert_eq!(runner.chart.views.len(), 1);
        assert_eq!(runner.chart.views[0], summary.view);

        let output = String::from_utf8(runner.into_prompter().into_output()).unwrap();
        assert!(output.contains("Performance(%)"));
        assert!(output.contains("AAA"));
        assert!(!output.contains(NO_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn test_all_tickers_failing_reports_no_data() {
        let mut runner = runner("W\nZZZ,YYY\ny\n", InMemoryMarketData::new(), true);

        let outcome = runner.run().await.unwrap();
        let expected_missing: Vec<Ticker> = ["YYY", "ZZZ"].iter().filter_map(|s| Ticker::parse(s)).collect();
        assert_eq!(
            outcome,
            RunOutcome::NoData {
                not_found: expected_missing
            }
        );
        assert!(runner.chart.views.is_empty());

        let output = String::from_utf8(runner.into_prompter().into_output()).unwrap();
        assert!(output.contains("No valid ETF data found. Exiting.\n"));
        assert!(output.contains("Tickers not found: YYY, ZZZ"));
    }

    #[tokio::test]
    async fn test_invalid_mode_ends_run() {
        let mut runner = runner("X\n", five_day_source(), false);
        assert_eq!(runner.run().await.unwrap(), RunOutcome::NoTickers);
        assert!(runner.fetcher.source().requests().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_silent_by_default() {
        let mut runner = runner("W\nAAA,BBB,GONE\nn\n01/03/2024\n10/03/2024\n", five_day_source(), false);

        let RunOutcome::Completed(summary) = runner.run().await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.not_found, vec![Ticker::parse("GONE").unwrap()]);

        let output = String::from_utf8(runner.into_prompter().into_output()).unwrap();
        assert!(!output.contains("Tickers not found"));
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let mut runner = runner("W\nAAA\n", five_day_source(), false);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, crate::error::EtfError::Input(InputError::Closed)));
    }
}
