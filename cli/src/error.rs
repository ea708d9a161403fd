use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Marker the data source puts in its failure reason for unknown or retired symbols
pub const DELISTED_MARKER: &str = "symbol may be delisted";

/// Operator input failures. The `Display` text is the diagnostic shown on the console.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Error: File not found!")]
    FileNotFound { path: PathBuf },

    #[error("Invalid input format!")]
    InvalidSelection { answer: String },

    #[error("Input closed before an answer was given")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Per-ticker retrieval failure reported by a market-data source
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Failed to download data for {ticker}. The symbol may be delisted.")]
    Delisted { ticker: String },

    #[error("Failed to download data for {ticker}. Reason: {reason}")]
    Failed { ticker: String, reason: String },
}

impl MarketDataError {
    /// Classify a raw failure reason, picking the delisted wording when the
    /// source flags the symbol as possibly retired
    pub fn from_reason(ticker: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.contains(DELISTED_MARKER) {
            MarketDataError::Delisted {
                ticker: ticker.to_string(),
            }
        } else {
            MarketDataError::Failed {
                ticker: ticker.to_string(),
                reason,
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write chart to {path}: {source}")]
    ChartWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum EtfError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EtfError>;
