pub mod data_fetcher;
pub mod market_data;
pub mod period_selector;
pub mod prompt;
pub mod ticker_source;

pub use data_fetcher::*;
pub use market_data::*;
pub use period_selector::*;
pub use prompt::*;
pub use ticker_source::*;
