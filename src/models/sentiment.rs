//! Market sentiment model: one classification label per calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily market sentiment reading (e.g. "Fear", "Greed", "Extreme Fear").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub classification: String,
}

impl SentimentRecord {
    pub fn new(date: NaiveDate, classification: impl Into<String>) -> Self {
        Self {
            date,
            classification: classification.into(),
        }
    }
}
