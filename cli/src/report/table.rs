use crate::models::{Ranking, Ticker};

pub const PERFORMANCE_HEADER: &str = "Performance(%)";

/// Two-column text table: ticker, then performance with one decimal
pub fn format_ranking(ranking: &Ranking) -> String {
    let ticker_width = ranking
        .iter()
        .map(|entry| entry.ticker.as_str().len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("{:<ticker_width$}  {}", "", PERFORMANCE_HEADER);
    for entry in ranking.iter() {
        out.push('\n');
        out.push_str(&format!(
            "{:<ticker_width$}  {:>width$.1}",
            entry.ticker.as_str(),
            entry.performance_pct,
            width = PERFORMANCE_HEADER.len()
        ));
    }
    out
}

/// One-line note listing tickers that could not be retrieved
pub fn format_not_found(not_found: &[Ticker]) -> Option<String> {
    if not_found.is_empty() {
        return None;
    }
    let symbols: Vec<&str> = not_found.iter().map(Ticker::as_str).collect();
    Some(format!("Tickers not found: {}", symbols.join(", ")))
}
