//! Console ranking table and performance chart output

pub mod chart;
pub mod table;

pub use chart::{render_svg, ChartSink, NoChart, SvgChart};
pub use table::{format_not_found, format_ranking, PERFORMANCE_HEADER};
