pub mod config;
pub mod yahoo;

use clap::Parser;
use etfperf::{
    api::{RunOutcome, RunnerBuilder},
    report::SvgChart,
    services::ConsolePrompter,
    utils::UsFederalCalendar,
};
use std::path::PathBuf;

const FAREWELL: &str = "\n\n\nGracefully exiting application...\n\n\n";

/// Rank ETFs by their performance over a chosen period
#[derive(Debug, Parser)]
#[command(name = "etf-performance", version, about)]
struct Cli {
    /// YAML configuration file (overrides CONFIG_FILE)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File read when the list of ETFs comes from a file
    #[arg(long, value_name = "FILE")]
    ticker_file: Option<PathBuf>,

    /// Where the performance chart is written
    #[arg(long, value_name = "FILE")]
    chart_output: Option<PathBuf>,

    /// Print the tickers that could not be downloaded
    #[arg(long)]
    report_failed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    etfperf::init_logger()?;
    let cli = Cli::parse();

    let mut app_config = config::AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.ticker_file {
        app_config.ticker_file = path;
    }
    if let Some(path) = cli.chart_output {
        app_config.chart_output = path;
    }
    if cli.report_failed {
        app_config.report_failed_tickers = true;
    }
    tracing::info!(ticker_file = %app_config.ticker_file.display(), chart = %app_config.chart_output.display(), "Loaded configuration");

    // Interrupts end the process from any prompt
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            print!("{}", FAREWELL);
            std::process::exit(0);
        }
    });

    let source = yahoo::YahooClient::new(&app_config.data_source)?;
    let calendar = UsFederalCalendar::new().with_extra_holidays(app_config.extra_holidays.iter().copied());

    let mut runner = RunnerBuilder::new()
        .with_answers(app_config.answers.clone())
        .with_ticker_file(app_config.ticker_file.clone())
        .report_not_found(app_config.report_failed_tickers)
        .build(
            ConsolePrompter::stdio(),
            source,
            calendar,
            SvgChart::new(app_config.chart_output.clone()),
        );

    match runner.run().await? {
        RunOutcome::Completed(summary) => {
            tracing::info!(funds = summary.ranking.len(), period = %summary.period, "Run completed");
        }
        RunOutcome::NoData { not_found } => {
            tracing::warn!(missing = not_found.len(), "No ETF data to rank");
        }
        RunOutcome::NoTickers => {}
    }

    Ok(())
}
