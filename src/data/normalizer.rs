//! Typed parsing of loaded tables into sentiment and trade records.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{DashboardConfig, MalformedRowPolicy};
use crate::error::{PipelineError, Result};
use crate::models::{SentimentRecord, TradeRecord};

use super::loader::Table;

pub const SENTIMENT_DATE: &str = "date";
pub const SENTIMENT_CLASSIFICATION: &str = "classification";

pub const TRADE_TIMESTAMP: &str = "Timestamp IST";
pub const TRADE_ACCOUNT: &str = "Account";
pub const TRADE_SIDE: &str = "Side";
pub const TRADE_CLOSED_PNL: &str = "Closed PnL";
pub const TRADE_START_POSITION: &str = "Start Position";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Records parsed from one table plus the number of rows dropped.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Parses tables according to the configured timestamp format and row policy.
pub struct Normalizer<'a> {
    config: &'a DashboardConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Parse the sentiment table's `date` and `classification` columns.
    ///
    /// Rows with an empty classification have no label to join on and are
    /// left out without counting as malformed.
    pub fn sentiment(&self, table: &Table) -> Result<Parsed<SentimentRecord>> {
        let date_col = table.column(SENTIMENT_DATE)?;
        let class_col = table.column(SENTIMENT_CLASSIFICATION)?;

        let mut parsed = Parsed {
            records: Vec::with_capacity(table.len()),
            skipped: 0,
        };

        for (row, record) in table.rows().iter().enumerate() {
            let classification = record.get(class_col).unwrap_or("").trim();
            if classification.is_empty() {
                debug!(row, "Sentiment row without classification ignored");
                continue;
            }

            let raw_date = record.get(date_col).unwrap_or("");
            match parse_calendar_date(raw_date) {
                Some(date) => parsed
                    .records
                    .push(SentimentRecord::new(date, classification)),
                None => self.reject(
                    &mut parsed.skipped,
                    invalid(table, row, SENTIMENT_DATE, raw_date),
                )?,
            }
        }

        debug!(
            records = parsed.records.len(),
            skipped = parsed.skipped,
            "Parsed sentiment table"
        );
        Ok(parsed)
    }

    /// Parse the trade log's timestamp, account, side, PnL and start position.
    pub fn trades(&self, table: &Table) -> Result<Parsed<TradeRecord>> {
        let columns = TradeColumns::resolve(table)?;

        let mut parsed = Parsed {
            records: Vec::with_capacity(table.len()),
            skipped: 0,
        };

        for (row, record) in table.rows().iter().enumerate() {
            match columns.parse(table, row, record, &self.config.timestamp_format) {
                Ok(trade) => parsed.records.push(trade),
                Err(e) => self.reject(&mut parsed.skipped, e)?,
            }
        }

        debug!(
            records = parsed.records.len(),
            skipped = parsed.skipped,
            "Parsed trade table"
        );
        Ok(parsed)
    }

    fn reject(&self, skipped: &mut usize, err: PipelineError) -> Result<()> {
        match self.config.on_malformed {
            MalformedRowPolicy::Fail => Err(err),
            MalformedRowPolicy::Skip => {
                warn!(error = %err, "Skipping malformed row");
                *skipped += 1;
                Ok(())
            }
        }
    }
}

/// Positions of the trade log columns the dashboard reads.
struct TradeColumns {
    timestamp: usize,
    account: usize,
    side: usize,
    closed_pnl: usize,
    start_position: usize,
}

impl TradeColumns {
    fn resolve(table: &Table) -> Result<Self> {
        Ok(Self {
            timestamp: table.column(TRADE_TIMESTAMP)?,
            account: table.column(TRADE_ACCOUNT)?,
            side: table.column(TRADE_SIDE)?,
            closed_pnl: table.column(TRADE_CLOSED_PNL)?,
            start_position: table.column(TRADE_START_POSITION)?,
        })
    }

    fn parse(
        &self,
        table: &Table,
        row: usize,
        record: &StringRecord,
        timestamp_format: &str,
    ) -> Result<TradeRecord> {
        let cell = |col: usize| record.get(col).unwrap_or("");

        let raw_ts = cell(self.timestamp);
        let timestamp = NaiveDateTime::parse_from_str(raw_ts.trim(), timestamp_format)
            .map_err(|_| invalid(table, row, TRADE_TIMESTAMP, raw_ts))?;

        let raw_pnl = cell(self.closed_pnl);
        let closed_pnl =
            parse_decimal(raw_pnl).ok_or_else(|| invalid(table, row, TRADE_CLOSED_PNL, raw_pnl))?;

        let raw_position = cell(self.start_position);
        let start_position = parse_float(raw_position)
            .ok_or_else(|| invalid(table, row, TRADE_START_POSITION, raw_position))?;

        Ok(TradeRecord::new(
            row,
            cell(self.account).to_string(),
            timestamp,
            cell(self.side).to_string(),
            closed_pnl,
            start_position,
        ))
    }
}

fn invalid(table: &Table, row: usize, column: &str, value: &str) -> PipelineError {
    PipelineError::InvalidValue {
        table: table.name().to_string(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Parse a sentiment date, discarding any time component.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local().date())
        })
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a PnL cell, accepting plain and scientific notation.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
