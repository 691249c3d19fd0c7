//! A trade tagged with the sentiment classification of its date.

use serde::{Deserialize, Serialize};

use super::trade::TradeRecord;

/// Trade record matched to a sentiment date.
///
/// `classification` is never empty: trades without a sentiment match are
/// dropped by the joiner rather than kept with a null marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub trade: TradeRecord,
    pub classification: String,
}

impl JoinedRecord {
    pub fn new(trade: TradeRecord, classification: String) -> Self {
        Self {
            trade,
            classification,
        }
    }
}
