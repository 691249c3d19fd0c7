//! Market Sentiment vs Trader Performance
//!
//! Joins a daily Bitcoin sentiment series with a trader's trade log by date
//! and reports PnL, leverage and side statistics per sentiment, plus a few
//! comparative insights and the top accounts.

mod config;
mod data;
mod error;
mod metrics;
mod models;
mod pipeline;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{DashboardConfig, MalformedRowPolicy};
use crate::data::Table;
use crate::pipeline::Pipeline;

/// Market sentiment vs trader performance dashboard CLI.
#[derive(Parser)]
#[command(name = "sentdash")]
#[command(about = "Compare trader performance across market sentiment", long_about = None)]
struct Cli {
    /// JSON configuration file (missing keys keep their defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "SENTDASH_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join sentiment with trades and print the dashboard
    Analyze {
        /// Bitcoin market sentiment CSV (date, classification)
        #[arg(short, long)]
        sentiment: Option<PathBuf>,

        /// Historical trader data CSV (Timestamp IST, Account, Side, Closed PnL, Start Position)
        #[arg(short, long)]
        trades: Option<PathBuf>,

        /// Write the merged dataset (default file name when no path is given)
        #[arg(short, long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Print the report as JSON instead of the text dashboard
        #[arg(long)]
        json: bool,

        /// Accounts listed per ranked table
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Classification compared against the baseline
        #[arg(long)]
        primary: Option<String>,

        /// Classification the primary is compared against
        #[arg(long)]
        baseline: Option<String>,

        /// What to do with rows that fail to parse
        #[arg(long, value_enum)]
        on_malformed: Option<MalformedRowPolicy>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            sentiment,
            trades,
            export,
            json,
            top,
            primary,
            baseline,
            on_malformed,
        } => {
            if let Some(top) = top {
                config.top_accounts = top;
            }
            if let Some(primary) = primary {
                config.primary_label = primary;
            }
            if let Some(baseline) = baseline {
                config.baseline_label = baseline;
            }
            if let Some(policy) = on_malformed {
                config.on_malformed = policy;
            }
            config.validate()?;

            let (Some(sentiment_path), Some(trades_path)) = (&sentiment, &trades) else {
                println!("\n=== Market Sentiment vs Trader Performance ===\n");
                if sentiment.is_none() {
                    println!("Upload Bitcoin Market Sentiment CSV:  --sentiment <PATH>");
                }
                if trades.is_none() {
                    println!("Upload Historical Trader Data CSV:    --trades <PATH>");
                }
                return Ok(());
            };

            let sentiment = Table::from_path("sentiment", sentiment_path)?;
            let trades = Table::from_path("trades", trades_path)?;

            let pipeline = Pipeline::new(config);
            let report = pipeline
                .run(&sentiment, &trades)
                .context("Dashboard run failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.dashboard(pipeline.config().chart_width));
            }

            if let Some(path) = export {
                let path = path.unwrap_or_else(|| PathBuf::from(&pipeline.config().export_file_name));
                report::write_to(&path, &report.merged_csv)?;
                info!(
                    path = %path.display(),
                    rows = report.summary.merged_trades,
                    "Merged dataset written"
                );
            }
        }

        Commands::Config => {
            config.validate()?;

            println!("\n=== Dashboard Configuration ===\n");
            println!("Comparison:");
            println!("  Primary Label:        {}", config.primary_label);
            println!("  Baseline Label:       {}", config.baseline_label);
            println!("  Top Accounts:         {}", config.top_accounts);

            println!("\nParsing:");
            println!("  Timestamp Format:     {}", config.timestamp_format);
            println!("  On Malformed Row:     {}", config.on_malformed);

            println!("\nOutput:");
            println!("  Export File Name:     {}", config.export_file_name);
            println!("  Chart Width:          {}", config.chart_width);
            println!("  Density Points:       {}", config.density_points);
        }
    }

    Ok(())
}
