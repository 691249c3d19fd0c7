//! Trade model representing one row of a trader's historical trade log.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two trade directions the insight rules report on. Trade records keep
/// their side as written in the log, so other labels pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual trade from the trade log, typed from its source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Zero-based data row index in the source table (header excluded)
    pub row: usize,

    /// Trading account identifier
    pub account: String,

    /// Local timestamp as written in the log (no timezone conversion)
    pub timestamp: NaiveDateTime,

    /// Calendar date of `timestamp`
    pub date: NaiveDate,

    /// Trade direction label, verbatim (`BUY`, `SELL`, ...)
    pub side: String,

    /// Realized profit/loss of the closed position
    pub closed_pnl: Decimal,

    /// Position size at open, used as a leverage proxy
    pub start_position: f64,
}

impl TradeRecord {
    pub fn new(
        row: usize,
        account: String,
        timestamp: NaiveDateTime,
        side: String,
        closed_pnl: Decimal,
        start_position: f64,
    ) -> Self {
        Self {
            row,
            account,
            timestamp,
            date: timestamp.date(),
            side,
            closed_pnl,
            start_position,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.closed_pnl > Decimal::ZERO
    }
}
