pub mod answers;
pub mod period;
pub mod price_table;
pub mod ranking;
pub mod ticker;

pub use answers::*;
pub use period::*;
pub use price_table::*;
pub use ranking::*;
pub use ticker::*;
