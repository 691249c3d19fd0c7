//! Date join of trades onto sentiment classifications.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::{JoinedRecord, SentimentRecord, TradeRecord};

/// Result of joining trades onto sentiment.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Matched trades in trade-log order
    pub records: Vec<JoinedRecord>,

    /// Trades whose date had no sentiment reading
    pub unmatched: usize,
}

/// Index sentiment readings by date.
///
/// At most one classification per date is a precondition of the join; a
/// repeated date is rejected rather than picked from.
pub fn index_by_date(sentiment: &[SentimentRecord]) -> Result<HashMap<NaiveDate, &str>> {
    let mut index = HashMap::with_capacity(sentiment.len());
    for record in sentiment {
        if index
            .insert(record.date, record.classification.as_str())
            .is_some()
        {
            return Err(PipelineError::DuplicateSentimentDate(record.date));
        }
    }
    Ok(index)
}

/// Tag each trade with the classification of its date, dropping trades on
/// dates with no reading.
pub fn join(trades: Vec<TradeRecord>, sentiment: &[SentimentRecord]) -> Result<JoinOutcome> {
    let index = index_by_date(sentiment)?;
    let total = trades.len();

    let records: Vec<JoinedRecord> = trades
        .into_iter()
        .filter_map(|trade| {
            index
                .get(&trade.date)
                .map(|label| JoinedRecord::new(trade, label.to_string()))
        })
        .collect();

    let unmatched = total - records.len();
    debug!(matched = records.len(), unmatched, "Joined trades onto sentiment");

    Ok(JoinOutcome { records, unmatched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn trade(row: usize, d: u32) -> TradeRecord {
        TradeRecord::new(
            row,
            format!("acct-{}", row),
            day(d).and_hms_opt(12, 0, 0).unwrap(),
            "BUY".to_string(),
            Decimal::ONE,
            1.0,
        )
    }

    fn sentiment() -> Vec<SentimentRecord> {
        vec![
            SentimentRecord::new(day(1), "Fear"),
            SentimentRecord::new(day(2), "Greed"),
        ]
    }

    #[test]
    fn test_unmatched_trades_dropped() {
        let trades = vec![trade(0, 1), trade(1, 3), trade(2, 2), trade(3, 1)];
        let outcome = join(trades, &sentiment()).unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.unmatched, 1);

        let rows: Vec<usize> = outcome.records.iter().map(|r| r.trade.row).collect();
        assert_eq!(rows, vec![0, 2, 3]);
        assert_eq!(outcome.records[1].classification, "Greed");
    }

    #[test]
    fn test_every_joined_label_matches_its_date() {
        let sentiment = sentiment();
        let trades: Vec<_> = (0..10).map(|i| trade(i, (i % 4 + 1) as u32)).collect();
        let total = trades.len();
        let outcome = join(trades, &sentiment).unwrap();

        assert!(outcome.records.len() <= total);
        for record in &outcome.records {
            assert!(!record.classification.is_empty());
            assert!(sentiment
                .iter()
                .any(|s| s.date == record.trade.date && s.classification == record.classification));
        }
    }

    #[test]
    fn test_all_matched_keeps_row_count() {
        let trades = vec![trade(0, 1), trade(1, 2)];
        let outcome = join(trades, &sentiment()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.unmatched, 0);
    }

    #[test]
    fn test_duplicate_sentiment_date_rejected() {
        let mut sentiment = sentiment();
        sentiment.push(SentimentRecord::new(day(2), "Extreme Greed"));

        let err = join(vec![trade(0, 1)], &sentiment).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateSentimentDate(d) if d == day(2)));
    }
}
