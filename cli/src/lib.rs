//! # etfperf - ETF performance ranking
//!
//! Interactive library behind the `etf-performance` binary:
//! - ticker intake from a file or a comma-separated list
//! - analysis period selection (year to date or an explicit range)
//! - per-ticker closing price retrieval that tolerates failures
//! - normalization, ranking and a chart of the ranked funds
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use etfperf::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut runner = RunnerBuilder::new().build(
//!         ConsolePrompter::stdio(),
//!         InMemoryMarketData::new(),
//!         UsFederalCalendar::new(),
//!         SvgChart::new("etf_performance.svg"),
//!     );
//!     runner.run().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod utils;
pub mod services;
pub mod report;

// Public API for easy library usage
pub mod api;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use etfperf::prelude::*;
    //! ```

    pub use crate::api::{PerformanceRunner, RunOutcome, RunSummary, RunnerBuilder};
    pub use crate::error::{EtfError, InputError, MarketDataError, ReportError};
    pub use crate::models::{AnswerSets, ClosingSeries, Period, Ranking, Ticker};
    pub use crate::report::{ChartSink, NoChart, SvgChart};
    pub use crate::services::{ConsolePrompter, InMemoryMarketData, MarketDataSource, Prompter};
    pub use crate::utils::{BusinessCalendar, BusinessDay, UsFederalCalendar, WeekendCalendar};
}

// Re-export some commonly used utilities
pub use utils::{init_logger, Logger, Timer};
