//! Statistics over joined trades: grouped aggregates and comparative insights.

mod aggregator;
mod insights;
mod stats;

pub use aggregator::{round_pnl, Aggregates, SideCounts};
pub use insights::Insights;
pub use stats::{BoxStats, DescriptiveStats, Density};
