//! The result of one dashboard run and its presentations.
//!
//! A `Report` is plain data: chart inputs, summary tables, insight messages
//! and the merged export. Drawing it (`Dashboard`) and writing the export
//! are separate steps.

mod charts;
mod export;
mod render;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{Aggregates, Insights};
use crate::models::TradeSide;

pub use charts::ChartSet;
pub use export::{merged_csv, write_to};
pub use render::Dashboard;

/// Row counts through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Data rows in the sentiment input
    pub sentiment_rows: usize,

    /// Data rows in the trade input
    pub trade_rows: usize,

    /// Rows dropped as malformed under the skip policy
    pub skipped_rows: usize,

    /// Trades dropped for lack of a sentiment reading on their date
    pub unmatched_trades: usize,

    /// Trades in the merged table
    pub merged_trades: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sentiment rows:   {}", self.sentiment_rows)?;
        writeln!(f, "Trade rows:       {}", self.trade_rows)?;
        writeln!(f, "Merged trades:    {}", self.merged_trades)?;
        writeln!(f, "No sentiment:     {}", self.unmatched_trades)?;
        if self.skipped_rows > 0 {
            writeln!(f, "Skipped (bad):    {}", self.skipped_rows)?;
        }
        Ok(())
    }
}

/// One line of the per-classification summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub classification: String,
    pub trades: usize,
    pub avg_pnl: Decimal,
    pub total_pnl: Decimal,
    pub win_rate: f64,
    pub avg_start_position: f64,
    pub buy: usize,
    pub sell: usize,
}

impl ClassSummary {
    /// One summary line for every classification present, ascending.
    pub fn from_aggregates(aggregates: &Aggregates) -> Vec<Self> {
        aggregates
            .classifications()
            .map(|label| {
                let sides = aggregates.sides(label);
                Self {
                    classification: label.to_string(),
                    trades: aggregates.trade_count(label),
                    avg_pnl: aggregates.avg_pnl.get(label).copied().unwrap_or_default(),
                    total_pnl: aggregates.total_pnl.get(label).copied().unwrap_or_default(),
                    win_rate: aggregates.win_rate.get(label).copied().unwrap_or(0.0),
                    avg_start_position: aggregates
                        .leverage_stats
                        .get(label)
                        .map_or(0.0, |s| s.mean),
                    buy: sides.get(TradeSide::Buy.as_str()),
                    sell: sides.get(TradeSide::Sell.as_str()),
                }
            })
            .collect()
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: RunSummary,
    pub classes: Vec<ClassSummary>,
    pub aggregates: Aggregates,
    pub charts: ChartSet,
    pub insights: Insights,

    /// Merged table as UTF-8 CSV bytes
    #[serde(skip)]
    pub merged_csv: Vec<u8>,
}

impl Report {
    /// Bind the report to a chart width for printing.
    pub fn dashboard(&self, width: usize) -> Dashboard<'_> {
        Dashboard::new(self, width)
    }
}
