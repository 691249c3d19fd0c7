//! The dashboard pipeline: normalize, join, aggregate, and assemble a report.

use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::data::{join, Normalizer, Table};
use crate::error::Result;
use crate::metrics::{Aggregates, Insights};
use crate::report::{merged_csv, ChartSet, ClassSummary, Report, RunSummary};

/// Runs the sentiment/trade analysis for loaded tables.
pub struct Pipeline {
    config: DashboardConfig,
}

impl Pipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run every stage to completion. Any failure aborts the run with no
    /// partial report.
    pub fn run(&self, sentiment: &Table, trades: &Table) -> Result<Report> {
        info!(
            sentiment_rows = sentiment.len(),
            trade_rows = trades.len(),
            "Running dashboard pipeline"
        );
        for table in [sentiment, trades] {
            if table.is_empty() {
                warn!(table = table.name(), "Input table has no data rows");
            }
        }

        let normalizer = Normalizer::new(&self.config);
        let parsed_sentiment = normalizer.sentiment(sentiment)?;
        let parsed_trades = normalizer.trades(trades)?;
        let skipped_rows = parsed_sentiment.skipped + parsed_trades.skipped;

        let outcome = join(parsed_trades.records, &parsed_sentiment.records)?;
        info!(
            merged = outcome.records.len(),
            unmatched = outcome.unmatched,
            skipped = skipped_rows,
            "Joined trades onto sentiment"
        );

        let aggregates = Aggregates::compute(&outcome.records);
        let insights = Insights::compute(&aggregates, &self.config)?;
        let charts = ChartSet::build(&aggregates, self.config.density_points);
        let export = merged_csv(trades, &outcome.records)?;

        let summary = RunSummary {
            sentiment_rows: sentiment.len(),
            trade_rows: trades.len(),
            skipped_rows,
            unmatched_trades: outcome.unmatched,
            merged_trades: outcome.records.len(),
        };

        info!(
            classifications = aggregates.side_counts.len(),
            export_bytes = export.len(),
            "Report ready"
        );

        Ok(Report {
            summary,
            classes: ClassSummary::from_aggregates(&aggregates),
            aggregates,
            charts,
            insights,
            merged_csv: export,
        })
    }
}
