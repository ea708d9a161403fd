use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Fund ticker symbol, always trimmed and upper-cased
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw text into a ticker. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let symbol = raw.trim();
        if symbol.is_empty() {
            return None;
        }
        Some(Self(symbol.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicate and sort raw entries into the ordered ticker list used by the pipeline
pub fn collect_tickers<'a, I>(entries: I) -> Vec<Ticker>
where
    I: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .filter_map(Ticker::parse)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
