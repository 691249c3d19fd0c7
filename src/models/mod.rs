//! Data models for sentiment readings, trades, and joined records.

mod joined;
mod sentiment;
mod trade;

pub use joined::JoinedRecord;
pub use sentiment::SentimentRecord;
pub use trade::{TradeRecord, TradeSide};
