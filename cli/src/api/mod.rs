//! High-level API: the analyzer and the interactive run built around it

pub mod analyzer;
pub mod builder;
pub mod runner;

pub use analyzer::{Analysis, PerformanceAnalyzer};
pub use builder::{RunnerBuilder, DEFAULT_TICKER_FILE};
pub use runner::{PerformanceRunner, RunOutcome, RunSummary, NO_DATA_MESSAGE};
